//! Console logger implementation

use super::file_logger::LogLevel;
use super::traits::Logger;

/// A logger that writes to the console
///
/// `info` goes to stdout, everything else to stderr. Messages below
/// `min_level` are dropped.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a console logger with the "[kvprefs]" prefix that shows everything from debug up
    pub fn new() -> Self {
        Self::with_prefix("[kvprefs]")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            min_level: LogLevel::Debug,
        }
    }

    /// Drop messages below `level`
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        if self.enabled(LogLevel::Debug) {
            eprintln!("{} DEBUG: {}", self.prefix, message);
        }
    }

    fn info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            println!("{} INFO: {}", self.prefix, message);
        }
    }

    fn warn(&self, message: &str) {
        if self.enabled(LogLevel::Warn) {
            eprintln!("{} WARN: {}", self.prefix, message);
        }
    }

    fn error(&self, message: &str) {
        if self.enabled(LogLevel::Error) {
            eprintln!("{} ERROR: {}", self.prefix, message);
        }
    }
}
