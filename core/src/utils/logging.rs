use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::env;

/// Wire the stderr logger. Warnings always show; `BINSIFT_DEBUG` (any
/// value) turns on debug lines with byte-offset detail
pub fn setup_logging() {
    let level = if env::var_os("BINSIFT_DEBUG").is_some() {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    );
}
