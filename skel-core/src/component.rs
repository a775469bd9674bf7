//! Renderable units.
//!
//! A [`Component`] is what a router produces: a bag of data plus a reference
//! to the template that renders it. The coordinator does not look inside;
//! it only hands components to a renderer or serializes their data.

use serde_json::{Map, Value};

/// Where a component's template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRef {
    /// Template source carried by the component itself.
    Inline(String),
    /// Template looked up by name through the store.
    Named(String),
}

impl TemplateRef {
    /// The inline source or the template name.
    pub fn as_str(&self) -> &str {
        match self {
            TemplateRef::Inline(source) | TemplateRef::Named(source) => source,
        }
    }
}

/// A renderable unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    data: Map<String, Value>,
    template: TemplateRef,
    children: Vec<(String, Component)>,
    status: Option<u16>,
}

impl Component {
    /// Creates a component rendered by `template`.
    pub fn new(template: TemplateRef) -> Self {
        Self {
            data: Map::new(),
            template,
            children: Vec::new(),
            status: None,
        }
    }

    /// Component with an inline template.
    pub fn inline(source: impl Into<String>) -> Self {
        Self::new(TemplateRef::Inline(source.into()))
    }

    /// Component with a named template.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(TemplateRef::Named(name.into()))
    }

    /// Sets a data value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a data value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Nests a child component under `key`.
    pub fn with_child(mut self, key: impl Into<String>, child: Component) -> Self {
        self.children.push((key.into(), child));
        self
    }

    /// Sets the HTTP status the response should carry.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Data values.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Looks up one data value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Template reference.
    pub fn template(&self) -> &TemplateRef {
        &self.template
    }

    /// Nested components in insertion order.
    pub fn children(&self) -> &[(String, Component)] {
        &self.children
    }

    /// Status requested by the component, `200` when unset.
    pub fn status(&self) -> u16 {
        self.status.unwrap_or(200)
    }

    /// Structured view of the component: its data with children nested
    /// under their keys.
    pub fn to_value(&self) -> Value {
        let mut data = self.data.clone();
        for (key, child) in &self.children {
            data.insert(key.clone(), child.to_value());
        }
        Value::Object(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_defaults_to_ok() {
        assert_eq!(Component::inline("").status(), 200);
        assert_eq!(Component::inline("").with_status(404).status(), 404);
    }

    #[test]
    fn test_to_value_nests_children() {
        let page = Component::named("page.html")
            .with("title", "Home")
            .with_child("nav", Component::inline("<nav/>").with("active", "home"));

        assert_eq!(
            page.to_value(),
            json!({ "title": "Home", "nav": { "active": "home" } })
        );
    }
}
