#![forbid(unsafe_code)]

//! Tie-point CSV import and export.
//!
//! # Format
//!
//! ```text
//! # Tie Points Export
//! # Origin Mode: Center
//! # Fixed Image Center: 320.0, 240.0
//! # Moving Image Center: 400.0, 300.0
//! # Format: index, fixed_x, fixed_y, moving_x, moving_y
//! 1,-12.500000,4.000000,-8.250000,3.000000
//! ```
//!
//! The center lines are only written in center mode. Rows are numbered from
//! 1 and carry complete pairs only, in display coordinates for the active
//! origin mode.
//!
//! # Import rules
//!
//! - Lines starting with `#` are metadata. Unknown metadata is ignored.
//! - A data row needs exactly five comma separated fields, the last four
//!   numeric. Anything else is skipped and counted.
//! - Coordinates are mapped back to canonical space using the recorded
//!   mode and centers. A missing center falls back to the currently loaded
//!   image; a missing mode line falls back to the current mode.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::coords::{CoordinateConverter, OriginMode};
use crate::geometry::{Point2, Side};
use crate::tiepoint::TiePointModel;

const TITLE_LINE: &str = "# Tie Points Export";
const MODE_PREFIX: &str = "Origin Mode:";
const FIXED_CENTER_PREFIX: &str = "Fixed Image Center:";
const MOVING_CENTER_PREFIX: &str = "Moving Image Center:";
const FORMAT_LINE: &str = "# Format: index, fixed_x, fixed_y, moving_x, moving_y";

/// Errors from reading or writing tie-point CSV files.
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no complete tie points to export")]
    NothingToExport,
    #[error("no valid tie points found ({skipped} row(s) skipped)")]
    NoValidRows { skipped: usize },
}

pub type Result<T> = std::result::Result<T, CsvError>;

/// Metadata recovered from `#` lines.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CsvHeader {
    pub origin_mode: Option<OriginMode>,
    pub fixed_center: Option<Point2>,
    pub moving_center: Option<Point2>,
}

impl CsvHeader {
    fn recorded_center(&self, side: Side) -> Option<Point2> {
        match side {
            Side::Fixed => self.fixed_center,
            Side::Moving => self.moving_center,
        }
    }
}

/// One parsed data row, still in the file's coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CsvRow {
    pub index: u32,
    pub fixed: Point2,
    pub moving: Point2,
}

/// A parsed CSV file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsvDocument {
    pub header: CsvHeader,
    pub rows: Vec<CsvRow>,
    pub skipped: usize,
}

/// Outcome of an import into a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    /// Mode the file was interpreted in.
    pub mode: OriginMode,
    /// Whether the mode came from the file header.
    pub mode_detected: bool,
}

// ============================================================================
// Export
// ============================================================================

/// Render the complete pairs of `model` in the converter's current mode.
#[must_use]
pub fn render(model: &TiePointModel, converter: &CoordinateConverter) -> String {
    let mode = converter.mode();
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE_LINE}");
    let _ = writeln!(out, "# {MODE_PREFIX} {}", mode.header_name());
    if mode.is_center() {
        let fc = converter.center(Side::Fixed);
        let mc = converter.center(Side::Moving);
        let _ = writeln!(out, "# {FIXED_CENTER_PREFIX} {:.1}, {:.1}", fc.x, fc.y);
        let _ = writeln!(out, "# {MOVING_CENTER_PREFIX} {:.1}, {:.1}", mc.x, mc.y);
    }
    let _ = writeln!(out, "{FORMAT_LINE}");

    for (row, pair) in model.complete_pairs().enumerate() {
        let Some((fixed, moving)) = pair.complete_points() else {
            continue;
        };
        let f = converter.to_display(Side::Fixed, fixed);
        let m = converter.to_display(Side::Moving, moving);
        let _ = writeln!(
            out,
            "{},{:.6},{:.6},{:.6},{:.6}",
            row + 1,
            f.x,
            f.y,
            m.x,
            m.y
        );
    }
    out
}

/// Write the complete pairs of `model` to `path`. Returns the row count.
pub fn export(
    path: impl AsRef<Path>,
    model: &TiePointModel,
    converter: &CoordinateConverter,
) -> Result<usize> {
    let path = path.as_ref();
    let count = model.complete_pair_count();
    if count == 0 {
        return Err(CsvError::NothingToExport);
    }
    fs::write(path, render(model, converter)).map_err(|source| CsvError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        target: "rigidlabel.io",
        path = %path.display(),
        rows = count,
        mode = %converter.mode(),
        "exported tie points"
    );
    Ok(count)
}

// ============================================================================
// Import
// ============================================================================

fn parse_center(value: &str) -> Option<Point2> {
    let (x, y) = value.split_once(',')?;
    Some(Point2::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn parse_metadata(line: &str, header: &mut CsvHeader) {
    let body = line.trim_start_matches('#').trim();
    if let Some(value) = body.strip_prefix(MODE_PREFIX) {
        match value.trim().parse() {
            Ok(mode) => header.origin_mode = Some(mode),
            Err(err) => {
                tracing::warn!(target: "rigidlabel.io", %err, "ignoring origin mode line");
            }
        }
    } else if let Some(value) = body.strip_prefix(FIXED_CENTER_PREFIX) {
        header.fixed_center = parse_center(value);
    } else if let Some(value) = body.strip_prefix(MOVING_CENTER_PREFIX) {
        header.moving_center = parse_center(value);
    }
}

fn parse_row(line: &str) -> Option<CsvRow> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 5 {
        return None;
    }
    let index = fields[0].parse().unwrap_or(0);
    let mut coords = [0.0_f64; 4];
    for (slot, field) in coords.iter_mut().zip(&fields[1..]) {
        *slot = field.parse().ok()?;
    }
    if coords.iter().any(|c| !c.is_finite()) {
        return None;
    }
    Some(CsvRow {
        index,
        fixed: Point2::new(coords[0], coords[1]),
        moving: Point2::new(coords[2], coords[3]),
    })
}

/// Parse CSV text. Never fails; bad rows are counted in `skipped`.
#[must_use]
pub fn parse(text: &str) -> CsvDocument {
    let mut doc = CsvDocument::default();
    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            parse_metadata(line, &mut doc.header);
            continue;
        }
        match parse_row(line) {
            Some(row) => doc.rows.push(row),
            None => {
                doc.skipped += 1;
                tracing::warn!(
                    target: "rigidlabel.io",
                    line = line_no + 1,
                    "skipping malformed tie point row"
                );
            }
        }
    }
    doc
}

/// Read and parse a CSV file.
pub fn read(path: impl AsRef<Path>) -> Result<CsvDocument> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| CsvError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&text))
}

impl CsvDocument {
    /// The mode rows are expressed in, falling back to `current`.
    #[must_use]
    pub fn effective_mode(&self, current: OriginMode) -> OriginMode {
        self.header.origin_mode.unwrap_or(current)
    }

    /// Rows mapped into canonical (top-left) space.
    ///
    /// Recorded centers win over the converter's; the converter only
    /// supplies centers the file did not record.
    #[must_use]
    pub fn canonical_pairs(&self, converter: &CoordinateConverter) -> Vec<(Point2, Point2)> {
        let mode = self.effective_mode(converter.mode());
        let offset = |side: Side| match mode {
            OriginMode::TopLeft => Point2::default(),
            OriginMode::Center => self
                .header
                .recorded_center(side)
                .unwrap_or_else(|| converter.center(side)),
        };
        let fixed_offset = offset(Side::Fixed);
        let moving_offset = offset(Side::Moving);
        self.rows
            .iter()
            .map(|row| (row.fixed + fixed_offset, row.moving + moving_offset))
            .collect()
    }

    /// Replace the points of `model` with the rows of this document.
    ///
    /// Imported pairs get fresh indices and no point-level undo entries.
    pub fn apply_to(
        &self,
        model: &mut TiePointModel,
        converter: &CoordinateConverter,
    ) -> Result<ImportSummary> {
        if self.rows.is_empty() {
            return Err(CsvError::NoValidRows {
                skipped: self.skipped,
            });
        }
        let pairs = self.canonical_pairs(converter);
        model.clear_all();
        for (fixed, moving) in &pairs {
            model.add_complete_pair(*fixed, *moving);
        }
        Ok(ImportSummary {
            imported: pairs.len(),
            skipped: self.skipped,
            mode: self.effective_mode(converter.mode()),
            mode_detected: self.header.origin_mode.is_some(),
        })
    }
}

/// Read `path` and replace the points of `model` with its rows.
pub fn import(
    path: impl AsRef<Path>,
    model: &mut TiePointModel,
    converter: &CoordinateConverter,
) -> Result<ImportSummary> {
    let path = path.as_ref();
    let summary = read(path)?.apply_to(model, converter)?;
    tracing::info!(
        target: "rigidlabel.io",
        path = %path.display(),
        imported = summary.imported,
        skipped = summary.skipped,
        mode = %summary.mode,
        "imported tie points"
    );
    Ok(summary)
}
