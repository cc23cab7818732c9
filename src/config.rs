//! # Configuration loading
//!
//! A configuration descriptor is plain data: a name plus the list of variables
//! it requires. [`load`] resolves every variable against a [`VariableSource`]
//! and reports all missing names at once.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};

/// Describes a group of required configuration variables.
#[derive(Debug, Clone, Copy)]
pub struct ConfigSchema {
    pub name: &'static str,
    pub variables: &'static [&'static str],
}

pub const GOOGLE_SERVICE_ACCOUNT: &str = "GOOGLE_SERVICE_ACCOUNT";
pub const GOOGLE_CLOUD_PROJECT: &str = "GOOGLE_CLOUD_PROJECT";

/// Credentials needed to talk to Google Cloud Storage: the service-account
/// key (JSON text) and the project that owns the buckets.
pub const GOOGLE_AUTHENTICATION: ConfigSchema = ConfigSchema {
    name: "GoogleAuthentication",
    variables: &[GOOGLE_SERVICE_ACCOUNT, GOOGLE_CLOUD_PROJECT],
};

/// Somewhere named string values can be looked up.
pub trait VariableSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct Environment;

impl VariableSource for Environment {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl VariableSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Tries each source in order; the first one holding a non-empty value wins.
#[derive(Default)]
pub struct Chain {
    sources: Vec<Box<dyn VariableSource>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl VariableSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl VariableSource for Chain {
    fn get(&self, name: &str) -> Option<String> {
        self.sources
            .iter()
            .filter_map(|s| s.get(name))
            .find(|v| !v.is_empty())
    }
}

/// Resolved values for one schema.
#[derive(Clone)]
pub struct Config {
    schema: &'static str,
    values: BTreeMap<&'static str, String>,
}

impl Config {
    pub fn schema(&self) -> &'static str {
        self.schema
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Like [`Config::get`] but for names the schema is known to contain.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| Error::MissingConfiguration {
            schema: self.schema.to_string(),
            missing: vec![name.to_string()],
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}

// Values are credentials; only the names are printed.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("schema", &self.schema)
            .field("variables", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolves every variable of `schema` from `source`. Empty values count as
/// missing.
pub fn load(schema: &ConfigSchema, source: &dyn VariableSource) -> Result<Config> {
    let mut values = BTreeMap::new();
    let mut missing = Vec::new();
    for &name in schema.variables {
        match source.get(name) {
            Some(v) if !v.is_empty() => {
                values.insert(name, v);
            }
            _ => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(Error::MissingConfiguration {
            schema: schema.name.to_string(),
            missing,
        });
    }
    Ok(Config {
        schema: schema.name,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn load_resolves_all_variables() {
        let source = vars(&[
            (GOOGLE_SERVICE_ACCOUNT, "{}"),
            (GOOGLE_CLOUD_PROJECT, "my-project"),
            ("UNRELATED", "x"),
        ]);
        let config = load(&GOOGLE_AUTHENTICATION, &source).unwrap();
        assert_eq!(config.schema(), "GoogleAuthentication");
        assert_eq!(config.get(GOOGLE_CLOUD_PROJECT), Some("my-project"));
        assert_eq!(config.require(GOOGLE_SERVICE_ACCOUNT).unwrap(), "{}");
        assert_eq!(config.get("UNRELATED"), None);
        assert_eq!(
            config.names().collect::<Vec<_>>(),
            vec![GOOGLE_CLOUD_PROJECT, GOOGLE_SERVICE_ACCOUNT]
        );
    }

    #[test]
    fn load_reports_every_missing_variable() {
        let source = vars(&[(GOOGLE_CLOUD_PROJECT, "")]);
        match load(&GOOGLE_AUTHENTICATION, &source) {
            Err(Error::MissingConfiguration { schema, missing }) => {
                assert_eq!(schema, "GoogleAuthentication");
                assert_eq!(missing, vec![GOOGLE_SERVICE_ACCOUNT, GOOGLE_CLOUD_PROJECT]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn chain_prefers_first_non_empty_value() {
        let chain = Chain::new()
            .with(vars(&[("A", ""), ("B", "first")]))
            .with(vars(&[("A", "second"), ("B", "ignored")]));
        assert_eq!(chain.get("A").as_deref(), Some("second"));
        assert_eq!(chain.get("B").as_deref(), Some("first"));
        assert_eq!(chain.get("C"), None);
    }

    #[test]
    fn debug_output_hides_values() {
        let source = vars(&[
            (GOOGLE_SERVICE_ACCOUNT, "super-secret"),
            (GOOGLE_CLOUD_PROJECT, "my-project"),
        ]);
        let config = load(&GOOGLE_AUTHENTICATION, &source).unwrap();
        let printed = format!("{config:?}");
        assert!(printed.contains(GOOGLE_SERVICE_ACCOUNT));
        assert!(!printed.contains("super-secret"));
    }
}
