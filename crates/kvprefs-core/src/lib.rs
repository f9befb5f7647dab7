//! kvprefs Core
//!
//! Typed preferences over plain string key-value stores.
//! Application code declares `Key<T>`s once, with a default value and string
//! conversion functions, and reads/writes them through `Preferences`,
//! whatever the backing store:
//!
//! - `MemoryKeyValueProvider`: in-memory map
//! - `PropertiesFileKeyValueProvider`: Java `.properties` file
//! - `KeychainKeyValueProvider`: platform credential store
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kvprefs_core::{Key, Preferences, PropertiesFileKeyValueProvider};
//! use once_cell::sync::Lazy;
//!
//! static MY_FIRST_SETTING: Lazy<Key<i32>> = Lazy::new(|| Key::parsed("myFirstSetting", 12345));
//! static MY_SECOND_SETTING: Lazy<Key<bool>> = Lazy::new(|| Key::parsed("mySecondSetting", true));
//!
//! let provider = PropertiesFileKeyValueProvider::new("mySettings.properties")?;
//! let preferences = Preferences::new(Arc::new(provider));
//!
//! preferences.set(&MY_FIRST_SETTING, Some(&500))?;
//! let value: i32 = preferences.get(&MY_FIRST_SETTING)?;
//! let maybe: Option<bool> = preferences.get_if_exists(&MY_SECOND_SETTING)?;
//! # Ok::<(), kvprefs_core::PreferencesError>(())
//! ```

pub mod logging;
pub mod provider;
pub mod preferences;

#[cfg(feature = "testutil")]
pub mod conformance;

// Re-export commonly used types
pub use provider::{
    KeyValueProvider, ProviderError, ProviderResult,
    MemoryKeyValueProvider, PropertiesFileKeyValueProvider, KeychainKeyValueProvider,
};

pub use preferences::{Key, Preferences, ConversionError, PreferencesError, PreferencesResult};

pub use logging::{Logger, SharedLogger, NoOpLogger, ConsoleLogger};
