//! Typed preferences
//!
//! - `Key<T>`: a named, typed preference with a default value
//! - `Preferences`: typed get/set/remove over any `KeyValueProvider`

mod error;
mod key;
mod facade;

pub use error::{ConversionError, PreferencesError, PreferencesResult};
pub use key::{Key, Parser, Serializer};
pub use facade::Preferences;
