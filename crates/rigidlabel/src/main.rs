#![forbid(unsafe_code)]

fn main() {
    rigidlabel::logging::init();
    if let Err(error) = rigidlabel::run_from_env() {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
