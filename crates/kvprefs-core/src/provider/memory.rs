//! In-memory key-value provider

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::traits::{KeyValueProvider, ProviderResult};

/// In-memory provider for testing and ephemeral use
///
/// Keeps its contents in a map that is lost when the last handle is dropped.
/// Never fails and is never persistent.
///
/// # Sharing
///
/// [`share`](Self::share) returns a second provider over the *same* map (not
/// a copy). This lets tests treat the memory provider like a persistent one
/// by "reopening" it.
///
/// # Example
///
/// ```
/// use kvprefs_core::provider::{KeyValueProvider, MemoryKeyValueProvider};
///
/// let provider = MemoryKeyValueProvider::new();
/// provider.set("port", Some("9090")).unwrap();
///
/// let other = provider.share();
/// assert_eq!(other.get("port").unwrap(), Some("9090".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MemoryKeyValueProvider {
    contents: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueProvider {
    /// Create a new empty memory provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory provider seeded with initial values
    pub fn with_contents(initial: HashMap<String, String>) -> Self {
        Self {
            contents: Arc::new(RwLock::new(initial)),
        }
    }

    /// Create another provider backed by the same map
    pub fn share(&self) -> Self {
        Self {
            contents: Arc::clone(&self.contents),
        }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.contents.read().clone()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.contents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every key
    pub fn clear(&self) {
        self.contents.write().clear();
    }
}

impl KeyValueProvider for MemoryKeyValueProvider {
    fn get(&self, key: &str) -> ProviderResult<Option<String>> {
        Ok(self.contents.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Option<&str>) -> ProviderResult<()> {
        let mut contents = self.contents.write();
        match value {
            Some(value) => {
                contents.insert(key.to_string(), value.to_string());
            }
            None => {
                contents.remove(key);
            }
        }
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
