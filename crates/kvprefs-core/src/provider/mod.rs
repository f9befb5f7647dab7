//! String key-value providers
//!
//! This module provides the storage boundary for preferences:
//! - `KeyValueProvider` trait for implementing custom backends
//! - Built-in implementations: `MemoryKeyValueProvider`,
//!   `PropertiesFileKeyValueProvider`, `KeychainKeyValueProvider`
//! - `Properties`, the Java `.properties` codec used by the file provider

mod traits;
mod memory;
mod properties;
mod file;
mod keychain;

pub use traits::{KeyValueProvider, ProviderError, ProviderResult};
pub use memory::MemoryKeyValueProvider;
pub use properties::Properties;
pub use file::{PropertiesFileKeyValueProvider, FILE_HEADER, DEFAULT_FILE_NAME};
pub use keychain::{KeychainKeyValueProvider, DEFAULT_SERVICE};
