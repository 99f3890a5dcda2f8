use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to create log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Logger already initialised: {0}")]
    AlreadySet(#[from] log::SetLoggerError),
}

fn loggers(
    level: LevelFilter,
    log_file: Option<&Path>,
) -> Result<Vec<Box<dyn SharedLogger>>, LoggerError> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Debug)
        .set_target_level(LevelFilter::Off)
        .build();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        // the file keeps the full detail of a sweep
        loggers.push(WriteLogger::new(
            LevelFilter::Debug.max(level),
            config,
            File::create(path)?,
        ));
    }
    Ok(loggers)
}

/// Terminal logging at `level`, plus a debug-level copy in `log_file` when given.
/// Can be called once per process.
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<(), LoggerError> {
    CombinedLogger::init(loggers(level, log_file)?)?;
    Ok(())
}
