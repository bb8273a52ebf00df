use std::path::{Path, PathBuf};

use chrono::{Datelike, Timelike};
// Re-export logging functions for convenience.
pub use log::*;
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{runtime::ConfigErrors, Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use thiserror::Error;

const SAVE_LOAD_TARGET: &str = "gs_save_load";

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("unable to open log file: {0}")]
    File(#[from] std::io::Error),
    #[error("invalid logging configuration: {0}")]
    Config(#[from] ConfigErrors),
    #[error(transparent)]
    Logger(#[from] SetLoggerError),
}

/// Initializes logging to the console and to a timestamped file under `log_dir`, and routes
/// panics through the logger. Should be called before any other logging functions. Provided
/// `LevelFilter` will remove all logs below the provided level, except that save/load warnings
/// always get through.
///
/// Returns the path of the log file.
pub fn init(filter: LevelFilter, log_dir: impl AsRef<Path>) -> Result<PathBuf, LogInitError> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} {t} - {m}{n}")))
        .build();

    // Name of the file is based on the current time.
    let now = chrono::Utc::now();
    let path = log_dir.as_ref().join(format!(
        "{} {} {} {} {} {}.txt",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    ));
    let log_file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d} - {l} - {t} - {m}{n}")))
        .build(&path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("log_file", Box::new(log_file)))
        .logger(Logger::builder().build(SAVE_LOAD_TARGET, save_load_filter(filter)))
        .build(
            Root::builder()
                .appender("log_file")
                .appender("stdout")
                .build(filter),
        )?;

    log4rs::init_config(config)?;

    log_panics::init();

    Ok(path)
}

/// Console-only logging, with the same save/load rule as [`init`].
///
/// Returns an error if a logger was already installed, which lets tests call this repeatedly.
pub fn init_console(filter: LevelFilter) -> Result<(), LogInitError> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} {t} - {m}{n}")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .logger(Logger::builder().build(SAVE_LOAD_TARGET, save_load_filter(filter)))
        .build(Root::builder().appender("stdout").build(filter))?;

    log4rs::init_config(config)?;

    Ok(())
}

/// A dropped entity or field is never silenced.
#[inline]
fn save_load_filter(filter: LevelFilter) -> LevelFilter {
    filter.max(LevelFilter::Warn)
}

#[cfg(test)]
mod tests;
