//! Offline command-line flows.
//!
//! 1. `convert` between origin modes is lossless to the CSV precision.
//! 2. A center file without sizes or recorded centers is refused.
//! 3. `--config` files are loaded and validated before any command runs.

use std::fs;
use std::path::Path;

use proptest::prelude::*;
use rigidlabel::cli::ConvertArgs;
use rigidlabel::{AppConfig, Cli, CliError, Commands, ConfigError, OriginMode, Point2, run};
use rigidlabel_core::ImageSize;
use rigidlabel_core::io::csv;

fn convert(dir: &Path, input: &Path, name: &str, to: OriginMode, sizes: bool) -> rigidlabel::Result<()> {
    let size = sizes.then(|| ImageSize::new(1921, 1080));
    run(Cli {
        config: Some(dir.join("absent.toml")),
        command: Commands::Convert(ConvertArgs {
            input: input.to_path_buf(),
            output: dir.join(name),
            to,
            from: OriginMode::TopLeft,
            fixed_size: size,
            moving_size: size,
        }),
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// convert
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn top_left_to_center_writes_header_and_offsets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.csv");
    fs::write(&input, "1,960.5,540,0,0\n").expect("write");

    convert(dir.path(), &input, "center.csv", OriginMode::Center, true).expect("convert");

    let doc = csv::read(dir.path().join("center.csv")).expect("read");
    assert_eq!(doc.header.origin_mode, Some(OriginMode::Center));
    assert_eq!(doc.header.fixed_center, Some(Point2::new(960.5, 540.0)));
    assert!(doc.rows[0].fixed.approx_eq(Point2::new(0.0, 0.0), 1e-9));
    assert!(doc.rows[0].moving.approx_eq(Point2::new(-960.5, -540.0), 1e-9));
}

#[test]
fn center_file_converts_back_without_sizes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.csv");
    fs::write(&input, "1,10,20,30,40\n2,50,60,70,80\n").expect("write");
    convert(dir.path(), &input, "center.csv", OriginMode::Center, true).expect("to center");

    // Recorded centers are enough to undo the offsets.
    convert(
        dir.path(),
        &dir.path().join("center.csv"),
        "back.csv",
        OriginMode::TopLeft,
        false,
    )
    .expect("to top-left");

    let back = csv::read(dir.path().join("back.csv")).expect("read");
    assert_eq!(back.header.origin_mode, Some(OriginMode::TopLeft));
    assert_eq!(back.rows.len(), 2);
    assert!(back.rows[1].moving.approx_eq(Point2::new(70.0, 80.0), 1e-6));
}

#[test]
fn center_target_without_sizes_is_refused() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.csv");
    fs::write(&input, "1,10,20,30,40\n").expect("write");
    let err = convert(dir.path(), &input, "out.csv", OriginMode::Center, false)
        .expect_err("sizes required");
    assert!(matches!(err, CliError::InvalidArgument { .. }));
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn file_without_rows_reports_nothing_to_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.csv");
    fs::write(&input, "# Tie Points Export\nnot,a,row\n").expect("write");
    let err = convert(dir.path(), &input, "out.csv", OriginMode::TopLeft, false)
        .expect_err("empty");
    assert!(matches!(err, CliError::Csv(_)));
    assert_eq!(err.exit_code(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// --config
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn show_config_accepts_valid_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rigidlabel.toml");
    fs::write(&path, "[ui]\ntheme = \"dark\"\n").expect("write");
    run(Cli {
        config: Some(path.clone()),
        command: Commands::ShowConfig,
    })
    .expect("show-config");
    assert_eq!(
        AppConfig::from_toml_file(&path).expect("load").ui.theme,
        "dark"
    );
}

#[test]
fn invalid_config_stops_every_command() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rigidlabel.toml");
    fs::write(&path, "[backend]\nbase_url = \"ftp://nowhere\"\n").expect("write");
    let err = run(Cli {
        config: Some(path),
        command: Commands::ShowConfig,
    })
    .expect_err("invalid");
    assert!(matches!(err, CliError::Config(ConfigError::Validation(_))));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn malformed_config_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rigidlabel.toml");
    fs::write(&path, "[backend\n").expect("write");
    let err = run(Cli {
        config: Some(path),
        command: Commands::Health,
    })
    .expect_err("parse");
    assert!(matches!(err, CliError::Config(ConfigError::Toml(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn convert_round_trip_is_stable(
        points in prop::collection::vec((0.0f64..1921.0, 0.0f64..1080.0), 1..8),
    ) {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("in.csv");
        let body: String = points
            .iter()
            .enumerate()
            .map(|(i, (x, y))| format!("{},{x:.6},{y:.6},{y:.6},{x:.6}\n", i + 1))
            .collect();
        fs::write(&input, body).expect("write");

        convert(dir.path(), &input, "c.csv", OriginMode::Center, true).expect("to center");
        convert(dir.path(), &dir.path().join("c.csv"), "t.csv", OriginMode::TopLeft, false)
            .expect("to top-left");

        let original = csv::read(&input).expect("read");
        let back = csv::read(dir.path().join("t.csv")).expect("read");
        prop_assert_eq!(original.rows.len(), back.rows.len());
        for (a, b) in original.rows.iter().zip(&back.rows) {
            prop_assert!(a.fixed.approx_eq(b.fixed, 1e-6));
            prop_assert!(a.moving.approx_eq(b.moving, 1e-6));
        }
    }
}
