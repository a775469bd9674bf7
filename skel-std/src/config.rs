//! File-backed configuration sources.
//!
//! # Load Order
//!
//! 1. Base file (`<stem>.toml`)
//! 2. Local override file (`<stem>.local.toml`)
//!
//! Both files must exist, even if empty. Each top-level key of the local
//! file replaces the base value wholesale.

use skel_core::{Config, ConfigError, ConfigMap, ConfigSource};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A TOML file whose top-level table is the key/value mapping.
#[derive(Debug, Clone)]
pub struct TomlFile {
    path: PathBuf,
}

impl TomlFile {
    /// Creates a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for TomlFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<ConfigMap, ConfigError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::missing_file(&self.path, e))?;
        parse_toml(&self.describe(), &content)
    }
}

/// Parses TOML text into a configuration mapping.
pub fn parse_toml(name: &str, content: &str) -> Result<ConfigMap, ConfigError> {
    let table: toml::Table =
        toml::from_str(content).map_err(|e| ConfigError::malformed(name, e.to_string()))?;

    table
        .into_iter()
        .map(|(key, value)| {
            serde_json::to_value(value)
                .map(|value| (key.clone(), value))
                .map_err(|e| ConfigError::malformed(name, format!("key `{key}`: {e}")))
        })
        .collect()
}

/// Loads and merges a base file and an override file.
pub fn load(base: impl AsRef<Path>, overrides: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let base = TomlFile::new(base.as_ref());
    let overrides = TomlFile::new(overrides.as_ref());
    debug!(base = %base.describe(), overrides = %overrides.describe(), "loading configuration");
    Config::load(&base, &overrides)
}

/// Loads `<stem>.toml` overridden by `<stem>.local.toml`.
pub fn load_layered(stem: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let (base, local) = layered_paths(stem.as_ref());
    load(base, local)
}

/// Paths of the base and local files for `stem`.
pub fn layered_paths(stem: &Path) -> (PathBuf, PathBuf) {
    let mut base = stem.as_os_str().to_owned();
    base.push(".toml");
    let mut local = stem.as_os_str().to_owned();
    local.push(".local.toml");
    (PathBuf::from(base), PathBuf::from(local))
}
