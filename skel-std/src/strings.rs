//! Localized string cache.
//!
//! The table is the built-in dictionary overridden by the store's strings.
//! It is built on first lookup and kept for the lifetime of the cache.

use skel_core::BoxError;
use std::{collections::HashMap, sync::OnceLock};

/// Built-in strings the coordinator relies on for error pages.
pub const DEFAULT_STRINGS: &[(&str, &str)] = &[
    (
        "err-access-denied",
        "<h1>Sorry, you can't do that</h1><p>You've tried to access a part of the system that requires more privileges than you have.</p>",
    ),
    (
        "err-request-missing",
        "<h1>System Error</h1><p>You must associate a request with this app instance before using this function</p>",
    ),
    ("err-404-header", "404 - Not Found"),
    (
        "err-404-text",
        "Sorry, we can't find the page you're looking for :(",
    ),
    ("err-500-header", "Error!"),
    (
        "err-500-text",
        "Sorry, something went wrong, and we're not sure what :(",
    ),
];

/// Lazily built string table.
#[derive(Debug, Default)]
pub struct StringCache {
    table: OnceLock<HashMap<String, String>>,
}

impl StringCache {
    /// Creates an empty, unbuilt cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the table has been built.
    pub fn is_built(&self) -> bool {
        self.table.get().is_some()
    }

    /// Returns the table, building it with `load` on first use.
    ///
    /// If `load` fails nothing is cached and the next call tries again.
    pub fn table<F>(&self, load: F) -> Result<&HashMap<String, String>, BoxError>
    where
        F: FnOnce() -> Result<HashMap<String, String>, BoxError>,
    {
        if let Some(table) = self.table.get() {
            return Ok(table);
        }

        let mut table: HashMap<String, String> = DEFAULT_STRINGS
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let stored = load()?;
        tracing::debug!(
            builtin = table.len(),
            stored = stored.len(),
            "building string table"
        );
        table.extend(stored);

        // A concurrent builder may have won; either table is equivalent.
        Ok(self.table.get_or_init(|| table))
    }

    /// Looks up `key`, falling back to `default` when the key is absent or
    /// maps to an empty string.
    pub fn get<F>(&self, key: &str, default: &str, load: F) -> Result<String, BoxError>
    where
        F: FnOnce() -> Result<HashMap<String, String>, BoxError>,
    {
        let table = self.table(load)?;
        Ok(match table.get(key) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => default.to_owned(),
        })
    }
}
