//! Error types for skel.
//!
//! - [`DispatchError`] - Errors raised while notifying listeners
//! - [`ConfigError`] - Errors raised while loading or reading configuration
//!
//! Collaborators (routers, stores, renderers) report failures as [`BoxError`].

use std::path::PathBuf;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while notifying listeners.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A listener returned an error. Listener errors are never swallowed.
    #[error("listener `{subscriber}::{handler}` failed during `{event}`")]
    Listener {
        /// Name of the event being notified.
        event: String,
        /// Subscriber that owned the failing listener.
        subscriber: String,
        /// Handler identifier of the failing listener.
        handler: String,
        /// The listener's error.
        #[source]
        source: BoxError,
    },
}

/// Errors that can occur while loading or reading configuration.
///
/// All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration source could not be located or read.
    #[error("configuration source `{name}` is missing: {source}")]
    MissingSource {
        /// Description of the source (usually a path).
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A configuration source did not yield a key/value mapping.
    #[error("configuration source `{name}` is malformed: {message}")]
    MalformedSource {
        /// Description of the source.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// The merged configuration has no value for the key.
    #[error("configuration has no value for the key `{0}`")]
    UnknownKey(String),

    /// The value exists but has the wrong shape.
    #[error("configuration value for `{key}` is invalid: expected {expected}")]
    InvalidValue {
        /// The offending key.
        key: String,
        /// Description of the expected value.
        expected: &'static str,
    },

    /// One or more required keys are missing.
    #[error("configuration is incomplete, missing: {}", .missing.join(", "))]
    Incomplete {
        /// Every required key that has no value.
        missing: Vec<String>,
    },
}

impl ConfigError {
    /// Creates a missing-source error for a file path.
    pub fn missing_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MissingSource {
            name: path.into().display().to_string(),
            source,
        }
    }

    /// Creates a malformed-source error.
    pub fn malformed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedSource {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid-value error.
    pub fn invalid(key: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidValue {
            key: key.into(),
            expected,
        }
    }
}
