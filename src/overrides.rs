//! User-supplied override values.
//!
//! An override replaces normal resolution for a name. It applies both to a
//! function name (the function is never invoked) and to a parameter name
//! (every parameter with that name is bound to the value).

use indexmap::IndexMap;
use thiserror::Error;
use wirescript_core::Value;
use wirescript_parser::Parser;

use crate::interp::constant_value;

/// A malformed `name=value` override.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    #[error("override '{0}' is not of the form name=value")]
    MissingSeparator(String),

    #[error("override '{0}' has an empty name")]
    EmptyName(String),
}

/// Name to value mapping consulted before any other binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideMap {
    values: IndexMap<String, Value>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from typed pairs. Later duplicates win.
    ///
    /// ```
    /// use wirescript::{OverrideMap, Value};
    ///
    /// let overrides = OverrideMap::from_pairs([("x", Value::Int(3)), ("y", Value::from("a"))]);
    /// assert_eq!(overrides.get("x"), Some(&Value::Int(3)));
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut map = Self::new();
        for (name, value) in pairs {
            map.insert(name, value);
        }
        map
    }

    /// Parse `name=value` strings.
    ///
    /// The value is read as a script literal when it is one (`3`, `-1.5`,
    /// `"s"`, `true`, `null`, `{1, 2}`, `{"k": 1}`). Anything else is kept as
    /// a raw string. Later duplicates win.
    ///
    /// ```
    /// use wirescript::{OverrideMap, Value};
    ///
    /// let overrides = OverrideMap::parse(["x=3", "mode=fast"]).unwrap();
    /// assert_eq!(overrides.get("x"), Some(&Value::Int(3)));
    /// assert_eq!(overrides.get("mode"), Some(&Value::from("fast")));
    /// ```
    pub fn parse<I, S>(args: I) -> Result<Self, OverrideError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for arg in args {
            let arg = arg.as_ref();
            let (name, raw) = arg
                .split_once('=')
                .ok_or_else(|| OverrideError::MissingSeparator(arg.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(OverrideError::EmptyName(arg.to_string()));
            }
            map.insert(name, parse_value(raw));
        }
        Ok(map)
    }

    /// Insert or replace an override.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Override names in the order they were first given.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn parse_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    Parser::expression(trimmed)
        .ok()
        .filter(|expr| expr.is_constant())
        .and_then(|expr| constant_value(&expr))
        .unwrap_or_else(|| Value::String(raw.to_string()))
}
