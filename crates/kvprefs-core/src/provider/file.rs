//! Properties-file key-value provider
//!
//! Stores everything in a single Java `.properties` file. The file is read
//! once at construction and rewritten in full on every `set`.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::properties::Properties;
use super::traits::{KeyValueProvider, ProviderError, ProviderResult};
use crate::logging::file_logger as log;

/// Header written at the top of every settings file
pub const FILE_HEADER: &str = "This file stores the settings of one of your applications. \
Deleting it may partially or completely reset the corresponding application.";

/// File name used by [`PropertiesFileKeyValueProvider::user`]
pub const DEFAULT_FILE_NAME: &str = "settings.properties";

/// Key-value provider backed by a Java `.properties` file
///
/// Writes are synchronous: `set` returns only after the whole file has been
/// rewritten. Writes through one instance are serialized by an internal lock.
///
/// Two instances opened on the same path do not coordinate. Each keeps its
/// own view loaded at construction and the last writer's view wins on disk.
///
/// # Example
///
/// ```no_run
/// use kvprefs_core::provider::{KeyValueProvider, PropertiesFileKeyValueProvider};
///
/// let provider = PropertiesFileKeyValueProvider::new("mySettings.properties").unwrap();
/// provider.set("volume", Some("11")).unwrap();
///
/// // Per-user location (~/.config/my-app/settings.properties on Linux)
/// let user = PropertiesFileKeyValueProvider::user("my-app").unwrap();
/// ```
pub struct PropertiesFileKeyValueProvider {
    path: PathBuf,
    properties: Mutex<Properties>,
}

impl PropertiesFileKeyValueProvider {
    /// Open the provider for `path`
    ///
    /// A missing file is treated as an empty store and created on the first
    /// `set`. Fails with [`ProviderError::InvalidConfiguration`] if `path` is
    /// a directory.
    pub fn new(path: impl Into<PathBuf>) -> ProviderResult<Self> {
        let path = path.into();
        let properties = Self::load(&path)?;
        log::debug(
            "PropertiesFileKeyValueProvider",
            &format!("opened '{}' with {} entries", path.display(), properties.len()),
        );
        Ok(Self {
            path,
            properties: Mutex::new(properties),
        })
    }

    /// Open the per-user settings file for `app_name`
    ///
    /// Uses the platform config directory (`~/.config` on Linux,
    /// `~/Library/Application Support` on macOS, `%APPDATA%` on Windows).
    pub fn user(app_name: &str) -> ProviderResult<Self> {
        Self::new(Self::user_path(app_name))
    }

    /// Path used by [`user`](Self::user)
    pub fn user_path(app_name: &str) -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join(app_name).join(DEFAULT_FILE_NAME)
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the backing file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Discard in-memory state and re-read the file
    pub fn reload(&self) -> ProviderResult<()> {
        let mut properties = self.properties.lock();
        *properties = Self::load(&self.path)?;
        Ok(())
    }

    fn load(path: &Path) -> ProviderResult<Properties> {
        if path.is_dir() {
            return Err(ProviderError::InvalidConfiguration(format!(
                "'{}' is a directory",
                path.display()
            )));
        }
        if !path.exists() {
            return Ok(Properties::new());
        }
        let bytes = fs::read(path)?;
        Properties::load(&bytes)
    }

    fn save(&self, properties: &Properties) -> ProviderResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, properties.store(Some(FILE_HEADER))).map_err(|e| {
            log::error(
                "PropertiesFileKeyValueProvider",
                &format!("failed to write '{}': {}", self.path.display(), e),
            );
            ProviderError::from(e)
        })
    }
}

impl KeyValueProvider for PropertiesFileKeyValueProvider {
    fn get(&self, key: &str) -> ProviderResult<Option<String>> {
        Ok(self.properties.lock().get(key).map(str::to_string))
    }

    fn set(&self, key: &str, value: Option<&str>) -> ProviderResult<()> {
        // Held until the file is written; dropped on every return path
        let mut properties = self.properties.lock();
        let mut updated = properties.clone();
        match value {
            Some(value) => {
                updated.insert(key, value);
            }
            None => {
                updated.remove(key);
            }
        }
        log::trace(
            "PropertiesFileKeyValueProvider",
            &format!("rewriting '{}' after set of '{}'", self.path.display(), key),
        );
        // Only a successful write becomes visible to `get`
        self.save(&updated)?;
        *properties = updated;
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for PropertiesFileKeyValueProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertiesFileKeyValueProvider")
            .field("path", &self.path)
            .field("exists", &self.exists())
            .finish()
    }
}
