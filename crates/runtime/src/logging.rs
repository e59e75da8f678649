use std::{
    io::{self, Write},
    sync::OnceLock,
};

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::PROGRAM_LOG_LEVEL;

/// Writes `<timestamp> <LEVEL> [<target>] <message>` lines to stderr.
pub struct Logger {
    level: Level,
}

impl Logger {
    fn line(record: &Record<'_>) -> String {
        format!(
            "{} {} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(io::stderr().lock(), "{}", Self::line(record));
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

fn get_level_from_env() -> Level {
    std::env::var(PROGRAM_LOG_LEVEL)
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .and_then(|filter| filter.to_level())
        .unwrap_or(Level::Warn)
}

/// Level selected by repeating `-d`: once for debug, twice or more for trace.
pub fn level_for_debug_count(count: u8) -> Option<Level> {
    match count {
        0 => None,
        1 => Some(Level::Debug),
        _ => Some(Level::Trace),
    }
}

/// Install the logger. `level` takes precedence over the environment.
pub fn init_with(level: Option<Level>) -> Result<(), SetLoggerError> {
    install(level.unwrap_or_else(get_level_from_env))
}

fn install(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    // Only the first call picks the level; later calls must not move the
    // max level away from the installed logger's.
    let first_call = LOGGER.get().is_none();
    let logger = LOGGER.get_or_init(|| Logger { level });

    if first_call {
        log::set_logger(logger)?;
        log::set_max_level(level.to_level_filter());
    }

    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
