//! Marker template renderer.
//!
//! Replaces `##key##` markers with the component's data values. Nested
//! components are substituted under their key. The template is scanned
//! once, so inserted text is never expanded again. Unknown markers are left
//! as they are.

use skel_core::{BoxError, Component, Renderer, Store, TemplateRef};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

const MARKER: &str = "##";

/// Errors raised while rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A named template was requested but no store was given.
    #[error("template `{0}` is named but the renderer has no store to load it from")]
    NoStore(String),
}

/// Renderer for `##key##` templates.
#[derive(Clone, Default)]
pub struct MarkerRenderer {
    store: Option<Arc<dyn Store>>,
}

impl MarkerRenderer {
    /// Renders inline templates only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves named templates through `store`.
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        Self { store: Some(store) }
    }

    fn source(&self, template: &TemplateRef) -> Result<String, BoxError> {
        match template {
            TemplateRef::Inline(source) => Ok(source.clone()),
            TemplateRef::Named(name) => {
                let store = self
                    .store
                    .as_ref()
                    .ok_or_else(|| RenderError::NoStore(name.clone()))?;
                Ok(store.template(name)?.source)
            }
        }
    }

    /// Text for `key`: a child's rendering first, then a data value.
    fn lookup(&self, component: &Component, key: &str) -> Result<Option<String>, BoxError> {
        if key.is_empty() || key.contains(|c: char| c.is_whitespace() || c == '#') {
            return Ok(None);
        }
        if let Some((_, child)) = component.children().iter().find(|(name, _)| name == key) {
            return self.render(child).map(Some);
        }
        Ok(component.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }))
    }
}

impl Renderer for MarkerRenderer {
    fn render(&self, component: &Component) -> Result<String, BoxError> {
        let source = self.source(component.template())?;
        let mut out = String::with_capacity(source.len());
        let mut rest = source.as_str();

        // Single pass: inserted text is never scanned for markers.
        while let Some(open) = rest.find(MARKER) {
            out.push_str(&rest[..open]);
            let after = &rest[open + MARKER.len()..];
            let Some(close) = after.find(MARKER) else {
                rest = &rest[open..];
                break;
            };
            let key = &after[..close];
            match self.lookup(component, key)? {
                Some(text) => {
                    out.push_str(&text);
                    rest = &after[close + MARKER.len()..];
                }
                None => {
                    // Keep the opening marker and rescan from the closing one.
                    out.push_str(MARKER);
                    out.push_str(key);
                    rest = &after[close..];
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}
