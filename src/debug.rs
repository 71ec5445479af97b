//! File-backed log bridge for fontpane
//!
//! The panel draws inside a terminal, so log records must never reach
//! stdout/stderr. `init_log_bridge` installs a `log::Log` implementation that
//! appends every record to `fontpane_debug.log` in the temp directory.
//!
//! The level comes from the caller or the FONTPANE_LOG environment variable:
//! - off or unset: no logging
//! - error, warn, info, debug, trace

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

const LOG_FILE_NAME: &str = "fontpane_debug.log";
const LEVEL_ENV: &str = "FONTPANE_LOG";

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

/// Parse a level name as accepted in FONTPANE_LOG.
pub fn parse_level(value: &str) -> Option<log::LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "off" => Some(log::LevelFilter::Off),
        "1" | "error" => Some(log::LevelFilter::Error),
        "warn" | "warning" => Some(log::LevelFilter::Warn),
        "2" | "info" => Some(log::LevelFilter::Info),
        "3" | "debug" => Some(log::LevelFilter::Debug),
        "4" | "trace" => Some(log::LevelFilter::Trace),
        _ => None,
    }
}

/// Level requested through FONTPANE_LOG, `Off` when unset or unrecognised.
pub fn level_from_env() -> log::LevelFilter {
    std::env::var(LEVEL_ENV)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(log::LevelFilter::Off)
}

struct FileLogger {
    level: log::LevelFilter,
    file: Mutex<Option<File>>,
}

impl FileLogger {
    fn open(level: log::LevelFilter) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path())
            .ok();
        let logger = Self {
            level,
            file: Mutex::new(file),
        };
        logger.write_raw(&format!(
            "\n{}\nfontpane session started at {} (level={})\n{}\n",
            "=".repeat(80),
            timestamp(),
            level,
            "=".repeat(80)
        ));
        logger
    }

    fn write_raw(&self, msg: &str) {
        // Failures are swallowed; a broken log must not break the panel
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.write_raw(&format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Route `log` records to the debug file.
///
/// `level` overrides FONTPANE_LOG. Returns false when logging stays off or
/// another logger is already installed.
pub fn init_log_bridge(level: Option<log::LevelFilter>) -> bool {
    let level = level.unwrap_or_else(level_from_env);
    if level == log::LevelFilter::Off {
        return false;
    }
    let logger = LOGGER.get_or_init(|| FileLogger::open(level));
    if log::set_logger(logger).is_err() {
        return false;
    }
    log::set_max_level(logger.level);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(log::LevelFilter::Debug));
        assert_eq!(parse_level(" TRACE "), Some(log::LevelFilter::Trace));
        assert_eq!(parse_level("warn"), Some(log::LevelFilter::Warn));
        assert_eq!(parse_level(""), Some(log::LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_off_does_not_install() {
        assert!(!init_log_bridge(Some(log::LevelFilter::Off)));
    }

    #[test]
    fn test_log_path_is_in_temp_dir() {
        assert!(log_path().starts_with(std::env::temp_dir()));
        assert!(log_path().ends_with(LOG_FILE_NAME));
    }
}
