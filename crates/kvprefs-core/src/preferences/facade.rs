//! Typed access over a string key-value provider

use std::sync::Arc;

use super::error::{PreferencesError, PreferencesResult};
use super::key::Key;
use crate::logging::{NoOpLogger, SharedLogger};
use crate::{log_debug, log_warn};
use crate::provider::KeyValueProvider;

/// Typed preferences over a [`KeyValueProvider`]
///
/// Holds no cache: every call goes straight to the provider, translating
/// values to and from strings with the key's conversion functions. Thread
/// safety is exactly that of the wrapped provider. Several `Preferences` may
/// share one provider.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use kvprefs_core::{Key, Preferences};
/// use kvprefs_core::provider::MemoryKeyValueProvider;
///
/// let port = Key::parsed("port", 8080u16);
/// let preferences = Preferences::new(Arc::new(MemoryKeyValueProvider::new()));
///
/// assert_eq!(preferences.get(&port).unwrap(), 8080);
/// preferences.set(&port, Some(&9090)).unwrap();
/// assert_eq!(preferences.get(&port).unwrap(), 9090);
/// assert_eq!(preferences.remove_key(&port).unwrap(), Some(9090));
/// assert!(!preferences.contains_key(&port).unwrap());
/// ```
#[derive(Clone)]
pub struct Preferences {
    provider: Arc<dyn KeyValueProvider>,
    logger: SharedLogger,
}

impl Preferences {
    /// Wrap a provider
    pub fn new(provider: Arc<dyn KeyValueProvider>) -> Self {
        Self {
            provider,
            logger: Arc::new(NoOpLogger::new()),
        }
    }

    /// Wrap a provider and report activity to `logger`
    pub fn with_logger(provider: Arc<dyn KeyValueProvider>, logger: SharedLogger) -> Self {
        Self { provider, logger }
    }

    /// Get the wrapped provider
    pub fn provider(&self) -> &Arc<dyn KeyValueProvider> {
        &self.provider
    }

    /// `true` if the wrapped provider survives application restarts
    pub fn is_persistent(&self) -> bool {
        self.provider.is_persistent()
    }

    /// Get the stored value for `key`, if there is one
    ///
    /// A stored string that the key cannot parse is returned as an error.
    pub fn get_if_exists<T>(&self, key: &Key<T>) -> PreferencesResult<Option<T>> {
        let Some(raw) = self.provider.get(key.unique_name())? else {
            return Ok(None);
        };
        match key.parse(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log_warn!(
                    self.logger,
                    "[Preferences] Stored value for '{}' does not parse: {}",
                    key.unique_name(),
                    e
                );
                Err(PreferencesError::Conversion(e))
            }
        }
    }

    /// Get the stored value for `key`, or its default value
    ///
    /// Never writes the default to the provider.
    pub fn get_or_default<T: Clone>(&self, key: &Key<T>) -> PreferencesResult<T> {
        Ok(self
            .get_if_exists(key)?
            .unwrap_or_else(|| key.default_value().clone()))
    }

    /// Same as [`get_or_default`](Self::get_or_default)
    pub fn get<T: Clone>(&self, key: &Key<T>) -> PreferencesResult<T> {
        self.get_or_default(key)
    }

    /// Check whether `key` has a stored value
    pub fn contains_key<T>(&self, key: &Key<T>) -> PreferencesResult<bool> {
        Ok(self.provider.get(key.unique_name())?.is_some())
    }

    /// Store `value` for `key`, or remove the key if `value` is `None`
    pub fn set<T>(&self, key: &Key<T>, value: Option<&T>) -> PreferencesResult<()> {
        let raw = value.map(|v| key.serialize(v)).transpose()?;
        log_debug!(
            self.logger,
            "[Preferences] {} '{}'",
            if raw.is_some() { "Setting" } else { "Removing" },
            key.unique_name()
        );
        self.provider.set(key.unique_name(), raw.as_deref())?;
        Ok(())
    }

    /// Remove `key`, returning the value it had
    pub fn remove_key<T>(&self, key: &Key<T>) -> PreferencesResult<Option<T>> {
        let previous = self.get_if_exists(key)?;
        self.set(key, None)?;
        Ok(previous)
    }
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("persistent", &self.provider.is_persistent())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::ConversionError;
    use crate::provider::{MemoryKeyValueProvider, ProviderError, ProviderResult};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn port_key() -> Key<u16> {
        Key::parsed("port", 8080)
    }

    fn setup() -> (Arc<MemoryKeyValueProvider>, Preferences) {
        let provider = Arc::new(MemoryKeyValueProvider::new());
        let preferences = Preferences::new(provider.clone());
        (provider, preferences)
    }

    #[test]
    fn test_port_scenario() {
        let (provider, preferences) = setup();
        let key = port_key();

        assert_eq!(preferences.get(&key).unwrap(), 8080);

        preferences.set(&key, Some(&9090)).unwrap();
        assert_eq!(preferences.get(&key).unwrap(), 9090);
        assert_eq!(provider.get("port").unwrap(), Some("9090".to_string()));

        preferences.set(&key, None).unwrap();
        assert_eq!(preferences.get(&key).unwrap(), 8080);
        assert!(!preferences.contains_key(&key).unwrap());
    }

    #[test]
    fn test_set_calls_serializer() {
        static SERIALIZER_CALLED: AtomicBool = AtomicBool::new(false);
        let key = Key::new(
            "dummyIntKey",
            12345i32,
            |raw: &str| raw.parse().map_err(|_| ConversionError::parse(raw, "not an int")),
            |value: &i32| {
                SERIALIZER_CALLED.store(true, Ordering::SeqCst);
                Ok(value.to_string())
            },
        );

        let (provider, preferences) = setup();
        preferences.set(&key, Some(&5678)).unwrap();

        assert!(SERIALIZER_CALLED.load(Ordering::SeqCst));
        assert_eq!(provider.snapshot().get("dummyIntKey"), Some(&"5678".to_string()));
    }

    #[test]
    fn test_get_calls_parser() {
        static PARSER_CALLED: AtomicBool = AtomicBool::new(false);
        let key = Key::new(
            "dummyIntKey",
            12345i32,
            |raw: &str| {
                PARSER_CALLED.store(true, Ordering::SeqCst);
                raw.parse().map_err(|_| ConversionError::parse(raw, "not an int"))
            },
            |value: &i32| Ok(value.to_string()),
        );

        let (_, preferences) = setup();
        preferences.set(&key, Some(&5678)).unwrap();
        assert!(!PARSER_CALLED.load(Ordering::SeqCst));

        assert_eq!(preferences.get(&key).unwrap(), 5678);
        assert!(PARSER_CALLED.load(Ordering::SeqCst));
    }

    #[test]
    fn test_get_if_exists_missing_key() {
        let (_, preferences) = setup();
        assert_eq!(preferences.get_if_exists(&port_key()).unwrap(), None);
    }

    #[test]
    fn test_get_or_default_does_not_write() {
        let (provider, preferences) = setup();
        assert_eq!(preferences.get_or_default(&port_key()).unwrap(), 8080);
        assert!(provider.is_empty());
    }

    #[test]
    fn test_contains_key() {
        let (_, preferences) = setup();
        let key = port_key();
        assert!(!preferences.contains_key(&key).unwrap());

        preferences.set(&key, Some(&567)).unwrap();
        assert!(preferences.contains_key(&key).unwrap());
    }

    #[test]
    fn test_remove_key() {
        let (_, preferences) = setup();
        let key = port_key();

        preferences.set(&key, Some(&567)).unwrap();
        assert_eq!(preferences.remove_key(&key).unwrap(), Some(567));
        assert!(!preferences.contains_key(&key).unwrap());

        // Removing again is a no-op
        assert_eq!(preferences.remove_key(&key).unwrap(), None);
        assert!(!preferences.contains_key(&key).unwrap());
    }

    #[test]
    fn test_malformed_stored_value_propagates() {
        let (provider, preferences) = setup();
        provider.set("port", Some("eighty")).unwrap();

        let err = preferences.get(&port_key()).unwrap_err();
        assert!(matches!(err, PreferencesError::Conversion(ConversionError::Parse { .. })));

        // contains_key does not parse
        assert!(preferences.contains_key(&port_key()).unwrap());
    }

    #[test]
    fn test_malformed_value_is_logged() {
        use crate::logging::Logger;
        use parking_lot::Mutex;

        #[derive(Default)]
        struct RecordingLogger {
            warnings: Mutex<Vec<String>>,
        }

        impl Logger for RecordingLogger {
            fn debug(&self, _message: &str) {}
            fn info(&self, _message: &str) {}
            fn warn(&self, message: &str) {
                self.warnings.lock().push(message.to_string());
            }
            fn error(&self, _message: &str) {}
        }

        let provider = Arc::new(MemoryKeyValueProvider::new());
        provider.set("port", Some("eighty")).unwrap();
        let logger = Arc::new(RecordingLogger::default());
        let preferences = Preferences::with_logger(provider, logger.clone());

        assert!(preferences.get_if_exists(&port_key()).is_err());
        let warnings = logger.warnings.lock();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("'port'"));
    }

    #[test]
    fn test_with_console_logger() {
        use crate::logging::{ConsoleLogger, LogLevel};

        let logger = Arc::new(ConsoleLogger::with_prefix("[test]").with_min_level(LogLevel::Error));
        let preferences = Preferences::with_logger(Arc::new(MemoryKeyValueProvider::new()), logger);
        preferences.set(&port_key(), Some(&1234)).unwrap();
        assert_eq!(preferences.get(&port_key()).unwrap(), 1234);
    }

    #[test]
    fn test_serializer_failure_leaves_store_untouched() {
        let key = Key::new(
            "even",
            0u32,
            |raw: &str| raw.parse().map_err(|_| ConversionError::parse(raw, "not a number")),
            |value: &u32| {
                if value % 2 == 0 {
                    Ok(value.to_string())
                } else {
                    Err(ConversionError::serialize("odd values are not allowed"))
                }
            },
        );

        let (provider, preferences) = setup();
        preferences.set(&key, Some(&2)).unwrap();

        let err = preferences.set(&key, Some(&3)).unwrap_err();
        assert!(matches!(err, PreferencesError::Conversion(ConversionError::Serialize(_))));
        assert_eq!(provider.get("even").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_provider_failure_propagates() {
        struct FailingProvider;

        impl KeyValueProvider for FailingProvider {
            fn get(&self, _key: &str) -> ProviderResult<Option<String>> {
                Err(ProviderError::Platform("store locked".to_string()))
            }

            fn set(&self, _key: &str, _value: Option<&str>) -> ProviderResult<()> {
                Err(ProviderError::Platform("store full".to_string()))
            }

            fn is_persistent(&self) -> bool {
                true
            }
        }

        let preferences = Preferences::new(Arc::new(FailingProvider));
        let key = port_key();

        assert!(matches!(preferences.get(&key), Err(PreferencesError::Provider(ProviderError::Platform(_)))));
        assert!(matches!(preferences.set(&key, Some(&1)), Err(PreferencesError::Provider(_))));
        assert!(matches!(preferences.contains_key(&key), Err(PreferencesError::Provider(_))));
        assert!(preferences.is_persistent());
    }

    #[test]
    fn test_shared_provider_between_preferences() {
        let provider: Arc<dyn KeyValueProvider> = Arc::new(MemoryKeyValueProvider::new());
        let first = Preferences::new(provider.clone());
        let second = Preferences::new(provider);
        let key = Key::parsed("theme", String::from("light"));

        first.set(&key, Some(&"dark".to_string())).unwrap();
        assert_eq!(second.get(&key).unwrap(), "dark");
    }
}
