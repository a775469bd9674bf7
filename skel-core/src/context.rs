//! The coordinator as seen from a router.

use crate::{
    config::{Config, ExecutionProfile},
    error::BoxError,
    http::Request,
};

/// Read access to the dispatching coordinator.
///
/// Routers receive this instead of the concrete coordinator so that they
/// can live in crates that do not depend on it.
pub trait AppContext: Send + Sync {
    /// Current configuration.
    fn config(&self) -> &Config;

    /// Current execution profile.
    fn execution_profile(&self) -> ExecutionProfile;

    /// The attached request, if any.
    fn request(&self) -> Option<&Request>;

    /// Localized string lookup; `default` when absent or empty.
    fn str(&self, key: &str, default: &str) -> Result<String, BoxError>;
}
