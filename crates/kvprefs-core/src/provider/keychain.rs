//! Platform settings store provider
//!
//! Uses the OS credential store as a string key-value store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use keyring::Entry;

use super::traits::{KeyValueProvider, ProviderError, ProviderResult};
use crate::logging::file_logger as log;

/// Service name used by [`KeychainKeyValueProvider::new`]
pub const DEFAULT_SERVICE: &str = "kvprefs";

/// Key-value provider backed by the platform credential store
///
/// Each key maps to one entry under the provider's service name. Writes are
/// handed to the platform API synchronously; how durably the platform flushes
/// them is up to the platform. Platform failures are returned unfiltered as
/// [`ProviderError::Platform`].
///
/// # Example
///
/// ```no_run
/// use kvprefs_core::provider::{KeyValueProvider, KeychainKeyValueProvider};
///
/// let provider = KeychainKeyValueProvider::with_service("my-app");
/// provider.set("lastUser", Some("alice")).unwrap();
/// assert_eq!(provider.get("lastUser").unwrap(), Some("alice".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct KeychainKeyValueProvider {
    service_name: String,
}

impl KeychainKeyValueProvider {
    /// Create a provider with the default service name "kvprefs"
    pub fn new() -> Self {
        Self::with_service(DEFAULT_SERVICE)
    }

    /// Create a provider with a custom service name
    ///
    /// The service name namespaces entries in the credential store, so two
    /// applications using different services never see each other's keys.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service_name: service.into(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Check whether the platform store can be reached
    ///
    /// Performs a real lookup, so it is `false` on headless machines without
    /// a credential daemon.
    pub fn is_available(&self) -> bool {
        let probe = Entry::new(&self.service_name, "__kvprefs_availability_check__")
            .and_then(|entry| entry.get_password());
        match probe {
            Ok(_) | Err(keyring::Error::NoEntry) => true,
            Err(e) => {
                log::warn("KeychainKeyValueProvider", &format!("is_available() = false, error: {:?}", e));
                false
            }
        }
    }

    fn entry(&self, key: &str) -> ProviderResult<Entry> {
        Entry::new(&self.service_name, key)
            .map_err(|e| ProviderError::Platform(format!("Failed to create keychain entry: {}", e)))
    }
}

impl Default for KeychainKeyValueProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueProvider for KeychainKeyValueProvider {
    fn get(&self, key: &str) -> ProviderResult<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                log::warn("KeychainKeyValueProvider", &format!("get('{}') error: {:?}", key, e));
                Err(ProviderError::Platform(format!("Failed to read from keychain: {}", e)))
            }
        }
    }

    fn set(&self, key: &str, value: Option<&str>) -> ProviderResult<()> {
        let entry = self.entry(key)?;
        match value {
            Some(value) => entry.set_password(value).map_err(|e| {
                log::error("KeychainKeyValueProvider", &format!("set('{}') failed: {:?}", key, e));
                ProviderError::Platform(format!("Failed to store in keychain: {}", e))
            }),
            None => match entry.delete_credential() {
                Ok(()) => Ok(()),
                Err(keyring::Error::NoEntry) => Ok(()), // Already absent
                Err(e) => Err(ProviderError::Platform(format!("Failed to delete from keychain: {}", e))),
            },
        }
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: tests marked #[ignore] require a running credential store
    // and may fail on CI systems without one.

    #[test]
    #[ignore] // Requires system keychain
    fn test_set_and_get() {
        let provider = KeychainKeyValueProvider::with_service("kvprefs-test");
        provider.set("test_key", None).unwrap();

        assert_eq!(provider.get("test_key").unwrap(), None);
        provider.set("test_key", Some("test_value")).unwrap();
        assert_eq!(provider.get("test_key").unwrap(), Some("test_value".to_string()));

        provider.set("test_key", None).unwrap();
        assert_eq!(provider.get("test_key").unwrap(), None);
    }

    #[test]
    #[ignore] // Requires system keychain
    fn test_second_instance_sees_writes() {
        let first = KeychainKeyValueProvider::with_service("kvprefs-test");
        first.set("persist_key", Some("value")).unwrap();

        let second = KeychainKeyValueProvider::with_service("kvprefs-test");
        assert_eq!(second.get("persist_key").unwrap(), Some("value".to_string()));

        first.set("persist_key", None).unwrap();
    }

    #[test]
    fn test_availability_matches_lookup() {
        let provider = KeychainKeyValueProvider::with_service("kvprefs-test-availability");
        assert_eq!(provider.is_available(), provider.get("missing_key").is_ok());
    }

    #[test]
    fn test_round_trip_when_available() {
        let provider = KeychainKeyValueProvider::with_service("kvprefs-test-round-trip");
        if !provider.is_available() {
            return;
        }
        provider.set("round_trip_key", Some("value")).unwrap();
        assert_eq!(provider.get("round_trip_key").unwrap(), Some("value".to_string()));
        provider.set("round_trip_key", None).unwrap();
        assert_eq!(provider.get("round_trip_key").unwrap(), None);
    }

    #[test]
    fn test_service_name() {
        assert_eq!(KeychainKeyValueProvider::new().service_name(), "kvprefs");
        assert_eq!(KeychainKeyValueProvider::with_service("app").service_name(), "app");
    }

    #[test]
    fn test_is_persistent() {
        assert!(KeychainKeyValueProvider::new().is_persistent());
    }
}
