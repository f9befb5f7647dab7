//! Typed preference keys

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::error::ConversionError;

/// Converts a stored string into a value
pub type Parser<T> = Arc<dyn Fn(&str) -> Result<T, ConversionError> + Send + Sync>;

/// Converts a value into its stored string
pub type Serializer<T> = Arc<dyn Fn(&T) -> Result<String, ConversionError> + Send + Sync>;

/// A typed, named preference
///
/// Binds a unique string name to a value type, a default value and the pair of
/// functions that convert values to and from their stored strings.
///
/// The caller is responsible for two things that are not checked:
/// - `unique_name` must be unique within the application. Reusing a name for
///   different keys has undefined results.
/// - `parse(serialize(v))` should equal `v`.
///
/// Keys are immutable and cheap to clone. Declare them once, typically as
/// statics:
///
/// ```
/// use kvprefs_core::Key;
/// use once_cell::sync::Lazy;
///
/// static PORT: Lazy<Key<u16>> = Lazy::new(|| Key::parsed("port", 8080));
/// static DARK_MODE: Lazy<Key<bool>> = Lazy::new(|| Key::parsed("darkMode", false));
///
/// assert_eq!(PORT.unique_name(), "port");
/// assert_eq!(*DARK_MODE.default_value(), false);
/// ```
pub struct Key<T> {
    unique_name: String,
    default_value: T,
    parser: Parser<T>,
    serializer: Serializer<T>,
}

impl<T> Key<T> {
    /// Create a key with custom conversion functions
    ///
    /// Both functions should be pure: no I/O and no shared mutable state.
    ///
    /// ```
    /// use kvprefs_core::{ConversionError, Key};
    ///
    /// #[derive(Debug, Clone, PartialEq, Default)]
    /// struct Window { width: u32, height: u32 }
    ///
    /// let key = Key::new(
    ///     "window",
    ///     Window::default(),
    ///     |s: &str| {
    ///         let (w, h) = s.split_once('x').ok_or_else(|| ConversionError::parse(s, "expected WxH"))?;
    ///         Ok(Window {
    ///             width: w.parse().map_err(|_| ConversionError::parse(s, "bad width"))?,
    ///             height: h.parse().map_err(|_| ConversionError::parse(s, "bad height"))?,
    ///         })
    ///     },
    ///     |w: &Window| Ok(format!("{}x{}", w.width, w.height)),
    /// );
    /// assert_eq!(key.parse("800x600").unwrap(), Window { width: 800, height: 600 });
    /// ```
    pub fn new<P, S>(unique_name: impl Into<String>, default_value: T, parser: P, serializer: S) -> Self
    where
        P: Fn(&str) -> Result<T, ConversionError> + Send + Sync + 'static,
        S: Fn(&T) -> Result<String, ConversionError> + Send + Sync + 'static,
    {
        Self {
            unique_name: unique_name.into(),
            default_value,
            parser: Arc::new(parser),
            serializer: Arc::new(serializer),
        }
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Convert a stored string into a value
    pub fn parse(&self, raw: &str) -> Result<T, ConversionError> {
        (self.parser)(raw)
    }

    /// Convert a value into its stored string
    pub fn serialize(&self, value: &T) -> Result<String, ConversionError> {
        (self.serializer)(value)
    }
}

impl<T> Key<T>
where
    T: FromStr + fmt::Display + 'static,
    T::Err: fmt::Display,
{
    /// Create a key stored via `Display` and parsed via `FromStr`
    ///
    /// Covers integers, floats, `bool`, `String`, `char`, IP addresses and any
    /// user type with matching `Display`/`FromStr` impls.
    pub fn parsed(unique_name: impl Into<String>, default_value: T) -> Self {
        Self::new(
            unique_name,
            default_value,
            |raw: &str| T::from_str(raw).map_err(|e| ConversionError::parse(raw, e.to_string())),
            |value: &T| Ok(value.to_string()),
        )
    }
}

impl<T> Key<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    /// Create a key stored as a JSON document
    ///
    /// ```
    /// use kvprefs_core::Key;
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    /// struct Recent { files: Vec<String> }
    ///
    /// let key = Key::json("recentFiles", Recent::default());
    /// let raw = key.serialize(&Recent { files: vec!["a.txt".into()] }).unwrap();
    /// assert_eq!(raw, r#"{"files":["a.txt"]}"#);
    /// ```
    pub fn json(unique_name: impl Into<String>, default_value: T) -> Self {
        Self::new(
            unique_name,
            default_value,
            |raw: &str| Ok(serde_json::from_str(raw)?),
            |value: &T| Ok(serde_json::to_string(value)?),
        )
    }
}

impl<T: Clone> Clone for Key<T> {
    fn clone(&self) -> Self {
        Self {
            unique_name: self.unique_name.clone(),
            default_value: self.default_value.clone(),
            parser: Arc::clone(&self.parser),
            serializer: Arc::clone(&self.serializer),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("unique_name", &self.unique_name)
            .field("default_value", &self.default_value)
            .finish_non_exhaustive()
    }
}
