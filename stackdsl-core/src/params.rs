//! External parameter handling
//!
//! Blueprints are compiled against an externally supplied parameter set:
//! scalar values under string keys, fed in from YAML/JSON documents or
//! inline `KEY=VALUE` defines. Keys are normalized to strings on ingest,
//! whatever scalar type the source document used.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::ParamsError;
use crate::template::PropertyValue;

/// A scalar external parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ParamValue {
    /// Whether the value counts as deliberately set for defaulting
    /// purposes. Only `Null` and `false` are assignable-over; `0` and the
    /// empty string are kept.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Null | Self::Bool(false))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<ParamValue> for PropertyValue {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Null => Self::Null,
            ParamValue::Bool(b) => Self::Bool(b),
            ParamValue::Integer(i) => Self::Integer(i),
            ParamValue::Float(f) => Self::Float(f),
            ParamValue::String(s) => Self::String(s),
        }
    }
}

/// The externally supplied parameter set, keyed by normalized string keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalParameters {
    values: BTreeMap<String, ParamValue>,
}

impl ExternalParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from key/value pairs, stringifying every key
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: std::fmt::Display,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut params = Self::new();
        for (key, value) in entries {
            params.insert(key, value);
        }
        params
    }

    pub fn insert(&mut self, key: impl ToString, value: impl Into<ParamValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Store `default` under `key` unless an existing entry is truthy, and
    /// return the entry that ends up in the map. Mirrors
    /// conditional-assignment defaulting: absent, null and `false` entries
    /// take the default, everything else is kept.
    pub fn set_default(
        &mut self,
        key: impl Into<String>,
        default: impl Into<ParamValue>,
    ) -> &ParamValue {
        match self.values.entry(key.into()) {
            Entry::Occupied(mut entry) => {
                if !entry.get().is_truthy() {
                    entry.insert(default.into());
                }
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(default.into()),
        }
    }

    /// Merge a YAML parameter document. The document must be a mapping of
    /// scalars; entries override existing ones.
    pub fn merge_yaml(&mut self, document: &str) -> Result<(), ParamsError> {
        let value: serde_yaml::Value = serde_yaml::from_str(document)?;
        let serde_yaml::Value::Mapping(mapping) = value else {
            return Err(ParamsError::NotAMapping);
        };

        for (key, value) in &mapping {
            let key = yaml_key(key)?;
            let value = yaml_scalar(&key, value)?;
            self.values.insert(key, value);
        }
        debug!(entries = mapping.len(), "Merged YAML parameters");
        Ok(())
    }

    /// Merge a JSON parameter document. The document must be an object of
    /// scalars; entries override existing ones.
    pub fn merge_json(&mut self, document: &str) -> Result<(), ParamsError> {
        let value: serde_json::Value = serde_json::from_str(document)?;
        let serde_json::Value::Object(object) = value else {
            return Err(ParamsError::NotAMapping);
        };

        for (key, value) in &object {
            let value = json_scalar(key, value)?;
            self.values.insert(key.clone(), value);
        }
        debug!(entries = object.len(), "Merged JSON parameters");
        Ok(())
    }

    /// Apply an inline `KEY=VALUE` define. The value is stored as a string.
    pub fn set_define(&mut self, spec: &str) -> Result<(), ParamsError> {
        let (key, value) = spec
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| ParamsError::InvalidDefine(spec.to_string()))?;
        self.insert(key, value);
        Ok(())
    }
}

fn yaml_key(key: &serde_yaml::Value) -> Result<String, ParamsError> {
    match key {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::String(s) => Ok(s.clone()),
        _ => Err(ParamsError::NonScalarKey),
    }
}

fn yaml_scalar(key: &str, value: &serde_yaml::Value) -> Result<ParamValue, ParamsError> {
    match value {
        serde_yaml::Value::Null => Ok(ParamValue::Null),
        serde_yaml::Value::Bool(b) => Ok(ParamValue::Bool(*b)),
        serde_yaml::Value::Number(n) => Ok(number_value(n.as_i64(), n.as_f64())),
        serde_yaml::Value::String(s) => Ok(ParamValue::String(s.clone())),
        _ => Err(ParamsError::NonScalarValue(key.to_string())),
    }
}

fn json_scalar(key: &str, value: &serde_json::Value) -> Result<ParamValue, ParamsError> {
    match value {
        serde_json::Value::Null => Ok(ParamValue::Null),
        serde_json::Value::Bool(b) => Ok(ParamValue::Bool(*b)),
        serde_json::Value::Number(n) => Ok(number_value(n.as_i64(), n.as_f64())),
        serde_json::Value::String(s) => Ok(ParamValue::String(s.clone())),
        _ => Err(ParamsError::NonScalarValue(key.to_string())),
    }
}

fn number_value(integer: Option<i64>, float: Option<f64>) -> ParamValue {
    match integer {
        Some(i) => ParamValue::Integer(i),
        None => ParamValue::Float(float.unwrap_or(f64::NAN)),
    }
}
