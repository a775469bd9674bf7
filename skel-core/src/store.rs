//! Persistence and templating contracts.

use crate::{component::Component, error::BoxError};
use std::collections::HashMap;

/// A template handle: its name and source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Name the template was requested by.
    pub name: String,
    /// Template source.
    pub source: String,
}

impl Template {
    /// Creates a template handle.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// The persistence collaborator.
pub trait Store: Send + Sync + 'static {
    /// Localized strings keyed by string id.
    fn strings(&self) -> Result<HashMap<String, String>, BoxError>;

    /// Loads a template by name.
    fn template(&self, name: &str) -> Result<Template, BoxError>;
}

/// The templating collaborator.
pub trait Renderer: Send + Sync + 'static {
    /// Renders a component to text.
    fn render(&self, component: &Component) -> Result<String, BoxError>;
}
