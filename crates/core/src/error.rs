//! Error types for value conversion
//!
//! This module defines all error types raised by the conversion layer.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Error Kinds
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | `NoConverterFound` | A type and all of its ancestors (including the universal base) are unregistered |
//! | `Conversion` | A wire string does not parse as the target type |
//! | `Config` | `waferslim.toml` cannot be read or is invalid |
//!
//! Errors are always returned to the immediate caller. Nothing in this layer
//! retries or suppresses them; reporting a malformed parameter back to the
//! remote test runner is the protocol layer's job.

use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the conversion layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No converter is registered for the type or any of its ancestors
    #[error("no converter found for type {type_name}")]
    NoConverterFound {
        /// Readable name of the requested type
        type_name: String,
    },

    /// Wire string could not be converted to the target type
    #[error("cannot convert {input:?} to {type_name}: {reason}")]
    Conversion {
        /// Readable name of the target type
        type_name: String,
        /// The offending wire string (possibly truncated)
        input: String,
        /// Why the conversion failed
        reason: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(String),
}

/// Longest slice of offending input kept in a `Conversion` error
const MAX_REPORTED_INPUT: usize = 64;

impl Error {
    /// Create a `Conversion` error
    pub fn conversion(
        type_name: impl Into<String>,
        input: &str,
        reason: impl Into<String>,
    ) -> Self {
        let input = match input.char_indices().nth(MAX_REPORTED_INPUT) {
            Some((cut, _)) => format!("{}...", &input[..cut]),
            None => input.to_string(),
        };
        Error::Conversion {
            type_name: type_name.into(),
            input,
            reason: reason.into(),
        }
    }

    /// Create a `NoConverterFound` error
    pub fn no_converter(type_name: impl Into<String>) -> Self {
        Error::NoConverterFound {
            type_name: type_name.into(),
        }
    }

    /// Create a `Config` error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// True for wire strings that failed to parse
    pub fn is_conversion(&self) -> bool {
        matches!(self, Error::Conversion { .. })
    }

    /// True when resolution found no converter at all
    pub fn is_no_converter(&self) -> bool {
        matches!(self, Error::NoConverterFound { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
