//! Preferences error types

use thiserror::Error;

use crate::provider::ProviderError;

/// Failure converting a value to or from its stored string form
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The stored string could not be parsed
    #[error("Cannot parse {input:?}: {message}")]
    Parse { input: String, message: String },

    /// The value could not be turned into a string
    #[error("Cannot serialize value: {0}")]
    Serialize(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConversionError {
    /// Create a parse error for `input`
    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a serialize error
    pub fn serialize(message: impl Into<String>) -> Self {
        Self::Serialize(message.into())
    }
}

/// Errors returned by [`Preferences`](super::Preferences)
///
/// Both variants carry the underlying error unchanged.
#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

pub type PreferencesResult<T> = Result<T, PreferencesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = ConversionError::parse("abc", "invalid digit found in string");
        assert_eq!(err.to_string(), "Cannot parse \"abc\": invalid digit found in string");
    }

    #[test]
    fn test_preferences_error_is_transparent() {
        let err: PreferencesError = ProviderError::InvalidConfiguration("'/tmp' is a directory".into()).into();
        assert_eq!(err.to_string(), "Invalid configuration: '/tmp' is a directory");

        let err: PreferencesError = ConversionError::serialize("unsupported").into();
        assert_eq!(err.to_string(), "Cannot serialize value: unsupported");
    }
}
