//! Error types for the coordinator.
//!
//! [`AppError`] is the top-level error of every [`App`](crate::App)
//! operation. Routing-domain failures (not found, unauthenticated,
//! unauthorized) never show up here: they are mapped to responses.

use skel_core::{BoxError, ConfigError, DispatchError};
use thiserror::Error;

/// Top-level error type for coordinator operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration is missing, malformed or incomplete.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A listener failed.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A response was requested with no request attached.
    #[error("no request is attached to the app")]
    NoRequest,

    /// The redirect status is not one of 301, 302, 303, 307 or 308.
    #[error("unsupported redirect code {0}")]
    UnsupportedRedirectCode(u16),

    /// The router returned something that is not a component.
    #[error("router returned a value that is not a component")]
    InvalidRouteResult,

    /// The string table could not be loaded from the store.
    #[error("could not load strings: {0}")]
    Strings(#[source] BoxError),

    /// A template could not be loaded from the store.
    #[error("could not load template `{name}`: {source}")]
    Template {
        /// Name of the template.
        name: String,
        /// The store's error.
        #[source]
        source: BoxError,
    },

    /// The renderer failed.
    #[error("render error: {0}")]
    Render(#[source] BoxError),

    /// Component data could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: AppError = ConfigError::UnknownKey("web-root".into()).into();
        assert!(matches!(err, AppError::Config(ConfigError::UnknownKey(_))));
        assert!(err.to_string().contains("web-root"));
    }

    #[test]
    fn test_redirect_code_message() {
        assert_eq!(
            AppError::UnsupportedRedirectCode(309).to_string(),
            "unsupported redirect code 309"
        );
    }
}
