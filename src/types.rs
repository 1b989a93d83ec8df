//! Core data model types for imports.
//!
//! A [`Record`] is one row of raw source data. [`ImportMode`] and [`ImportParams`] carry the
//! per-import configuration read from an [`crate::import::ImportContext`].

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::{ImportError, ImportResult};

/// One row of raw source data: an ordered mapping from field name to string value.
///
/// Field order follows the source header row. Serializes as a JSON object in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from `(name, value)` pairs, keeping their order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut out = Self::new();
        for (k, v) in pairs {
            out.set(k, v);
        }
        out
    }

    /// Value of field `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set field `name`. Existing fields keep their position; new fields are appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Remove field `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.fields.iter().position(|(k, _)| k == name)?;
        Some(self.fields.remove(idx).1)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// How an import applies incoming records to existing content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Replace existing content with the imported record.
    #[default]
    Update,
    /// Only overwrite the fields present in the imported record.
    Patch,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Update => "UPDATE",
            ImportMode::Patch => "PATCH",
        }
    }

    /// Resolve the mode from an optional context value; absent or null means [`ImportMode::Update`].
    pub fn from_value(value: Option<&Value>) -> ImportResult<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::String(s)) => s.parse(),
            Some(other) => Err(ImportError::Config {
                message: format!("mode must be a string, got {other}"),
            }),
        }
    }
}

impl FromStr for ImportMode {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "UPDATE" => Ok(ImportMode::Update),
            "PATCH" => Ok(ImportMode::Patch),
            _ => Err(ImportError::Config {
                message: format!("unknown import mode '{s}' (expected UPDATE or PATCH)"),
            }),
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Import parameters handed to the record materialization step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportParams(Map<String, Value>);

impl ImportParams {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parse params stored on an import.
    ///
    /// Accepts a JSON object, a string holding a JSON object, or nothing at all. Empty strings
    /// and `null` give empty params.
    pub fn from_value(value: Option<&Value>) -> ImportResult<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Object(map)) => Ok(Self(map.clone())),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(Self::default()),
            Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(map)) => Ok(Self(map)),
                Ok(other) => Err(ImportError::Config {
                    message: format!("params must be a json object, got {other}"),
                }),
                Err(e) => Err(ImportError::Config {
                    message: format!("params are not valid json: {e}"),
                }),
            },
            Some(other) => Err(ImportError::Config {
                message: format!("params must be a json object, got {other}"),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Boolean param; accepts JSON booleans, numbers and the usual string spellings.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().map(|v| v != 0).unwrap_or(default),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" | "" => false,
                _ => default,
            },
            _ => default,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
