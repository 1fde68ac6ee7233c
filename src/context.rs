//! Data handed to helpers during one replacement pass

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur when loading context data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse data TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// Arrays and nested tables have no string form
    #[error("unsupported value for key '{key}': expected a string, number, boolean or datetime")]
    UnsupportedValue { key: String },
}

/// String-keyed values visible to helpers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Load context data from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load context data from the top-level table of a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, DataError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut context = Self::new();
        for (key, value) in table {
            let text = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Datetime(d) => d.to_string(),
                toml::Value::Array(_) | toml::Value::Table(_) => {
                    return Err(DataError::UnsupportedValue { key });
                }
            };
            context.insert(key, text);
        }
        Ok(context)
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
