//! Logging abstractions
//!
//! - `Logger` trait with `NoOpLogger` and `ConsoleLogger`, injected into `Preferences`
//! - `file_logger`, a global debug log used by the storage providers

mod traits;
mod noop;
mod console;
pub mod file_logger;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;

pub use file_logger::{log_file_path, LogConfig, LogLevel};
