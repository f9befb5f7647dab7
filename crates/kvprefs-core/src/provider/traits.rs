//! Core trait and error types for string key-value providers

use thiserror::Error;

/// Errors that can occur during provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider was pointed at something it cannot use (e.g. a directory)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored content could not be decoded
    #[error("Malformed content at line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// Failure reported by the platform settings store
    #[error("Platform store error: {0}")]
    Platform(String),
}

impl ProviderError {
    /// Create a malformed content error
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Abstraction over simple string-based key-value stores
///
/// Implementations:
/// - `MemoryKeyValueProvider`: In-memory map, for tests and ephemeral state
/// - `PropertiesFileKeyValueProvider`: Java `.properties` file
/// - `KeychainKeyValueProvider`: Platform settings store via the OS keychain
///
/// Removal is expressed as `set(key, None)`. After that, `get(key)` must
/// return `Ok(None)`, never an empty string.
///
/// # Example
///
/// ```
/// use kvprefs_core::provider::{KeyValueProvider, MemoryKeyValueProvider};
///
/// let provider = MemoryKeyValueProvider::new();
/// provider.set("theme", Some("dark")).unwrap();
/// assert_eq!(provider.get("theme").unwrap(), Some("dark".to_string()));
///
/// provider.set("theme", None).unwrap();
/// assert_eq!(provider.get("theme").unwrap(), None);
/// ```
pub trait KeyValueProvider: Send + Sync {
    /// Retrieve the value stored for `key`
    ///
    /// Returns `Ok(None)` if no value was ever stored or it was removed.
    /// An unknown key is not an error.
    fn get(&self, key: &str) -> ProviderResult<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value
    ///
    /// `None` deletes the mapping for `key` entirely.
    fn set(&self, key: &str, value: Option<&str>) -> ProviderResult<()>;

    /// `true` if stored data survives application restarts
    fn is_persistent(&self) -> bool;
}
