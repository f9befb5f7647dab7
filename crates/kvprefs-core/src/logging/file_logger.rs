//! Global file logger for troubleshooting storage backends
//!
//! Providers report through this logger because they have no `Logger`
//! injected. It is off unless `KVPREFS_DEBUG` is `1` or `true`;
//! `KVPREFS_LOG_LEVEL` (`trace`, `debug`, `info`, `warn`, `error`) sets the
//! threshold. Lines are appended to `<temp dir>/kvprefs-debug.log`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

/// Environment variable that enables file logging
pub const DEBUG_ENV: &str = "KVPREFS_DEBUG";

/// Environment variable holding the minimum level
pub const LEVEL_ENV: &str = "KVPREFS_LOG_LEVEL";

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Parse a level name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO "),
            LogLevel::Warn => write!(f, "WARN "),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// File logger settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub enabled: bool,
    pub min_level: LogLevel,
    pub path: PathBuf,
}

impl LogConfig {
    /// Read settings from `KVPREFS_DEBUG` and `KVPREFS_LOG_LEVEL`
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(DEBUG_ENV).ok().as_deref(),
            std::env::var(LEVEL_ENV).ok().as_deref(),
        )
    }

    fn from_values(debug: Option<&str>, level: Option<&str>) -> Self {
        let enabled = debug
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let min_level = level.and_then(LogLevel::from_name).unwrap_or(LogLevel::Debug);
        Self {
            enabled,
            min_level,
            path: default_log_path(),
        }
    }
}

struct FileLoggerState {
    config: LogConfig,
    file: Option<File>,
}

impl FileLoggerState {
    fn new(config: LogConfig) -> Self {
        let file = if config.enabled { open_append(&config.path) } else { None };
        Self { config, file }
    }

    fn write(&mut self, level: LogLevel, module: &str, message: &str) {
        if !self.config.enabled || level < self.config.min_level {
            return;
        }
        if let Some(file) = self.file.as_mut() {
            let _ = writeln!(file, "[{}] [{}] [{}] {}", timestamp(), level, module, message);
            let _ = file.flush();
        }
    }
}

fn open_append(path: &Path) -> Option<File> {
    OpenOptions::new().create(true).append(true).open(path).ok()
}

fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("kvprefs-debug.log")
}

/// Time of day in UTC as HH:MM:SS.mmm
fn timestamp() -> String {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs();
            format!(
                "{:02}:{:02}:{:02}.{:03}",
                (secs % 86400) / 3600,
                (secs % 3600) / 60,
                secs % 60,
                d.subsec_millis()
            )
        })
        .unwrap_or_else(|_| "??:??:??.???".to_string())
}

static LOGGER: Lazy<Mutex<FileLoggerState>> =
    Lazy::new(|| Mutex::new(FileLoggerState::new(LogConfig::from_env())));

/// Replace the settings read from the environment
pub fn configure(config: LogConfig) {
    *LOGGER.lock() = FileLoggerState::new(config);
}

/// Log a message at the specified level
pub fn log(level: LogLevel, module: &str, message: &str) {
    LOGGER.lock().write(level, module, message);
}

pub fn trace(module: &str, message: &str) {
    log(LogLevel::Trace, module, message);
}

pub fn debug(module: &str, message: &str) {
    log(LogLevel::Debug, module, message);
}

pub fn info(module: &str, message: &str) {
    log(LogLevel::Info, module, message);
}

pub fn warn(module: &str, message: &str) {
    log(LogLevel::Warn, module, message);
}

pub fn error(module: &str, message: &str) {
    log(LogLevel::Error, module, message);
}

/// Get the path to the log file
pub fn log_file_path() -> PathBuf {
    LOGGER.lock().config.path.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels() {
        assert!(LogLevel::Debug > LogLevel::Trace);
        assert!(LogLevel::Info > LogLevel::Debug);
        assert!(LogLevel::Warn > LogLevel::Info);
        assert!(LogLevel::Error > LogLevel::Warn);
    }

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::from_name("TRACE"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_name(" warning "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_name("verbose"), None);
    }

    #[test]
    fn test_config_from_values() {
        let config = LogConfig::from_values(None, None);
        assert!(!config.enabled);
        assert_eq!(config.min_level, LogLevel::Debug);

        let config = LogConfig::from_values(Some("TRUE"), Some("error"));
        assert!(config.enabled);
        assert_eq!(config.min_level, LogLevel::Error);

        let config = LogConfig::from_values(Some("0"), Some("nonsense"));
        assert!(!config.enabled);
        assert_eq!(config.min_level, LogLevel::Debug);
    }

    #[test]
    fn test_state_respects_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        let mut state = FileLoggerState::new(LogConfig {
            enabled: true,
            min_level: LogLevel::Info,
            path: path.clone(),
        });

        state.write(LogLevel::Debug, "test", "hidden");
        state.write(LogLevel::Warn, "test", "shown");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("hidden"));
        assert!(content.contains("[WARN ] [test] shown"));
    }

    #[test]
    fn test_default_log_path() {
        assert!(LogConfig::from_env().path.ends_with("kvprefs-debug.log"));
    }

    #[test]
    fn test_configure_redirects_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configured.log");
        configure(LogConfig {
            enabled: true,
            min_level: LogLevel::Trace,
            path: path.clone(),
        });
        trace("configure_test", "redirected message");
        configure(LogConfig::from_env());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[TRACE] [configure_test] redirected message"));
    }

    #[test]
    fn test_logging() {
        // Just make sure it doesn't panic
        debug("test", "test message");
        info("test", "test message");
        warn("test", "test message");
        error("test", "test message");
    }
}
