//! Configuration values.
//!
//! A [`Config`] is the merge of a base source and an override source. The
//! override replaces base values key for key; nested tables are replaced
//! whole, never merged. Lookups fail loudly: there is no silent default at
//! this layer.

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{collections::BTreeMap, fmt, str::FromStr};

/// A flat key/value mapping yielded by a [`ConfigSource`].
pub type ConfigMap = BTreeMap<String, Value>;

/// Key holding the execution profile.
pub const EXEC_PROFILE_KEY: &str = "exec-profile";
/// Key holding the application's context root directory.
pub const CONTEXT_ROOT_KEY: &str = "context-root";
/// Key holding the public web root.
pub const WEB_ROOT_KEY: &str = "web-root";

/// A provider of configuration values.
pub trait ConfigSource {
    /// Human-readable description used in errors (usually a path).
    fn describe(&self) -> String;

    /// Reads the mapping.
    ///
    /// Fails with [`ConfigError::MissingSource`] when the source cannot be
    /// located or read and [`ConfigError::MalformedSource`] when it does not
    /// yield a key/value mapping.
    fn read(&self) -> Result<ConfigMap, ConfigError>;
}

impl ConfigSource for ConfigMap {
    fn describe(&self) -> String {
        "<memory>".to_owned()
    }

    fn read(&self) -> Result<ConfigMap, ConfigError> {
        Ok(self.clone())
    }
}

/// Deployment mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionProfile {
    /// Live deployment. Error pages never expose internals.
    #[default]
    Production,
    /// Pre-release deployment.
    Beta,
    /// Test and development runs.
    Test,
}

impl ExecutionProfile {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionProfile::Production => "production",
            ExecutionProfile::Beta => "beta",
            ExecutionProfile::Test => "test",
        }
    }

    /// Whether error details may be shown to users.
    pub fn exposes_errors(&self) -> bool {
        !matches!(self, ExecutionProfile::Production)
    }

    /// Parses a configuration value: a name or the legacy integer flags
    /// (`1` production, `2` beta, `4` test).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => name.parse().ok(),
            Value::Number(n) => match n.as_i64()? {
                1 => Some(ExecutionProfile::Production),
                2 => Some(ExecutionProfile::Beta),
                4 => Some(ExecutionProfile::Test),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromStr for ExecutionProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(ExecutionProfile::Production),
            "beta" => Ok(ExecutionProfile::Beta),
            "test" => Ok(ExecutionProfile::Test),
            _ => Err(ConfigError::invalid(
                EXEC_PROFILE_KEY,
                "one of `production`, `beta`, `test`",
            )),
        }
    }
}

impl fmt::Display for ExecutionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merged configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    values: ConfigMap,
}

impl Config {
    /// Wraps an already merged mapping.
    pub fn new(values: ConfigMap) -> Self {
        Self { values }
    }

    /// Reads both sources and merges them, override winning per key.
    pub fn load(
        base: &dyn ConfigSource,
        overrides: &dyn ConfigSource,
    ) -> Result<Self, ConfigError> {
        let base = base.read()?;
        let overrides = overrides.read()?;
        Ok(Self::merge(base, overrides))
    }

    /// Key-for-key replacement of `base` by `overrides`.
    pub fn merge(mut base: ConfigMap, overrides: ConfigMap) -> Self {
        base.extend(overrides);
        Self { values: base }
    }

    /// Looks up a value.
    pub fn get(&self, key: &str) -> Result<&Value, ConfigError> {
        self.values
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_owned()))
    }

    /// Explicit optional lookup.
    pub fn get_optional(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether the key has a value.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Looks up a string value.
    pub fn get_str(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| ConfigError::invalid(key, "a string"))
    }

    /// Looks up an integer value.
    pub fn get_i64(&self, key: &str) -> Result<i64, ConfigError> {
        self.get(key)?
            .as_i64()
            .ok_or_else(|| ConfigError::invalid(key, "an integer"))
    }

    /// Looks up a boolean value.
    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        self.get(key)?
            .as_bool()
            .ok_or_else(|| ConfigError::invalid(key, "a boolean"))
    }

    /// Deserializes a value into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        T::deserialize(self.get(key)?).map_err(|_| {
            ConfigError::invalid(key, std::any::type_name::<T>())
        })
    }

    /// Sets a value in memory. Backing sources are never written.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Checks that every key in `required` has a value.
    pub fn require(&self, required: &[&str]) -> Result<(), ConfigError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|key| !self.contains(key))
            .map(|key| (*key).to_owned())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Incomplete { missing })
        }
    }

    /// Renders every entry as ``key: `value`;`` on its own line.
    pub fn dump(&self) -> String {
        self.values
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{key}: `{s}`;"),
                other => format!("{key}: `{other}`;"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Iterates keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The underlying mapping.
    pub fn values(&self) -> &ConfigMap {
        &self.values
    }

    /// `context-root`.
    pub fn context_root(&self) -> Result<&str, ConfigError> {
        self.get_str(CONTEXT_ROOT_KEY)
    }

    /// `web-root`.
    pub fn public_root(&self) -> Result<&str, ConfigError> {
        self.get_str(WEB_ROOT_KEY)
    }

    /// `exec-profile`, parsed.
    pub fn execution_profile(&self) -> Result<ExecutionProfile, ConfigError> {
        ExecutionProfile::from_value(self.get(EXEC_PROFILE_KEY)?).ok_or_else(|| {
            ConfigError::invalid(EXEC_PROFILE_KEY, "one of `production`, `beta`, `test`")
        })
    }
}

impl FromIterator<(String, Value)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(pairs: &[(&str, Value)]) -> ConfigMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn test_override_wins_per_key() {
        let base = map(&[("a", json!(1)), ("b", json!(2))]);
        let overrides = map(&[("b", json!(3)), ("c", json!(4))]);

        let config = Config::load(&base, &overrides).unwrap();

        assert_eq!(config.get("a").unwrap(), &json!(1));
        assert_eq!(config.get("b").unwrap(), &json!(3));
        assert_eq!(config.get("c").unwrap(), &json!(4));
        assert_eq!(config.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tables_are_replaced_not_merged() {
        let base = map(&[("db", json!({ "file": "a.db", "pool": 4 }))]);
        let overrides = map(&[("db", json!({ "file": "b.db" }))]);

        let config = Config::merge(base, overrides);

        assert_eq!(config.get("db").unwrap(), &json!({ "file": "b.db" }));
    }

    #[test]
    fn test_unknown_key_fails() {
        let config = Config::default();
        assert!(matches!(
            config.get("missing"),
            Err(ConfigError::UnknownKey(key)) if key == "missing"
        ));
        assert!(config.get_optional("missing").is_none());
    }

    #[test]
    fn test_typed_lookups() {
        let mut config = Config::default();
        config.set("name", "skel").set("port", 8080).set("debug", true);

        assert_eq!(config.get_str("name").unwrap(), "skel");
        assert_eq!(config.get_i64("port").unwrap(), 8080);
        assert!(config.get_bool("debug").unwrap());
        assert_eq!(config.get_as::<u16>("port").unwrap(), 8080);
        assert!(matches!(
            config.get_i64("name"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_require_reports_all_missing() {
        let mut config = Config::default();
        config.set("web-root", "/srv");

        let err = config
            .require(&["exec-profile", "web-root", "context-root"])
            .unwrap_err();

        match err {
            ConfigError::Incomplete { missing } => {
                assert_eq!(missing, vec!["exec-profile", "context-root"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dump() {
        let mut config = Config::default();
        config.set("a", "x").set("b", 2);
        assert_eq!(config.dump(), "a: `x`;\nb: `2`;");
    }

    #[test]
    fn test_execution_profile_parsing() {
        let mut config = Config::default();
        config.set(EXEC_PROFILE_KEY, "beta");
        assert_eq!(config.execution_profile().unwrap(), ExecutionProfile::Beta);

        config.set(EXEC_PROFILE_KEY, 4);
        assert_eq!(config.execution_profile().unwrap(), ExecutionProfile::Test);

        config.set(EXEC_PROFILE_KEY, "staging");
        assert!(config.execution_profile().is_err());
    }
}
