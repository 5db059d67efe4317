//! Loosely-typed values as they arrive from the scripting side or the kernel.
//!
//! A [`RawValue`] is whatever the caller assigned to a field before
//! validation. [`RawFields`] is an ordered map of documented field names to
//! raw values; it is the only input the validator accepts and the shape the
//! kernel reports outcomes in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single unvalidated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<RawValue>),
    Map(IndexMap<String, RawValue>),
}

/// The shape of a raw value, used in type-mismatch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Integer,
    Float,
    String,
    List,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        };
        f.write_str(name)
    }
}

impl RawValue {
    /// Build a list value.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        RawValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a map value, preserving insertion order.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        RawValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The shape of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            RawValue::Bool(_) => ValueKind::Bool,
            RawValue::Int(_) => ValueKind::Integer,
            RawValue::Float(_) => ValueKind::Float,
            RawValue::Str(_) => ValueKind::String,
            RawValue::List(_) => ValueKind::List,
            RawValue::Map(_) => ValueKind::Map,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, RawValue>> {
        match self {
            RawValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Append an unambiguous byte encoding of this value to `out`.
    ///
    /// Equal values always encode identically; floats are encoded by bit
    /// pattern, so callers wanting `0.0 == -0.0` must normalize first.
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        fn write_str(out: &mut Vec<u8>, s: &str) {
            out.extend_from_slice(&(s.len() as u64).to_le_bytes());
            out.extend_from_slice(s.as_bytes());
        }

        match self {
            RawValue::Bool(b) => {
                out.push(0);
                out.push(*b as u8);
            }
            RawValue::Int(i) => {
                out.push(1);
                out.extend_from_slice(&i.to_le_bytes());
            }
            RawValue::Float(x) => {
                out.push(2);
                out.extend_from_slice(&x.to_bits().to_le_bytes());
            }
            RawValue::Str(s) => {
                out.push(3);
                write_str(out, s);
            }
            RawValue::List(items) => {
                out.push(4);
                out.extend_from_slice(&(items.len() as u64).to_le_bytes());
                for item in items {
                    item.write_canonical(out);
                }
            }
            RawValue::Map(entries) => {
                out.push(5);
                out.extend_from_slice(&(entries.len() as u64).to_le_bytes());
                for (key, value) in entries {
                    write_str(out, key);
                    value.write_canonical(out);
                }
            }
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(i) => write!(f, "{}", i),
            RawValue::Float(x) => write!(f, "{}", x),
            RawValue::Str(s) => write!(f, "{:?}", s),
            RawValue::List(items) => write!(f, "[{} items]", items.len()),
            RawValue::Map(entries) => write!(f, "{{{} entries}}", entries.len()),
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Int(value as i64)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Int(value as i64)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Str(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Str(value)
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(value: Vec<RawValue>) -> Self {
        RawValue::List(value)
    }
}

impl From<IndexMap<String, RawValue>> for RawValue {
    fn from(value: IndexMap<String, RawValue>) -> Self {
        RawValue::Map(value)
    }
}

impl From<RawFields> for RawValue {
    fn from(value: RawFields) -> Self {
        RawValue::Map(value.0)
    }
}

/// Ordered field-name → raw-value assignments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFields(IndexMap<String, RawValue>);

impl RawFields {
    /// Create an empty set of assignments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a field, returning the updated set.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Remove a field, returning the updated set.
    pub fn without(mut self, name: &str) -> Self {
        self.0.shift_remove(name);
        self
    }

    /// Assign a field in place. Reassigning keeps the original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names in assignment order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Canonical byte encoding of all assignments, in order.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        RawValue::Map(self.0.clone()).write_canonical(&mut out);
        out
    }
}

impl FromIterator<(String, RawValue)> for RawFields {
    fn from_iter<T: IntoIterator<Item = (String, RawValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for RawFields {
    type Item = (String, RawValue);
    type IntoIter = indexmap::map::IntoIter<String, RawValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<IndexMap<String, RawValue>> for RawFields {
    fn from(value: IndexMap<String, RawValue>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_preserves_order_and_overwrites_in_place() {
        let fields = RawFields::new()
            .with("temperature", 310.0)
            .with("sodium", 0.5)
            .with("temperature", 300.0);

        assert_eq!(fields.names().collect::<Vec<_>>(), vec!["temperature", "sodium"]);
        assert_eq!(fields.get("temperature"), Some(&RawValue::Float(300.0)));
    }

    #[test]
    fn test_json_integers_and_floats_stay_distinct() {
        let fields: RawFields = serde_json::from_str(
            r#"{"num_simulations": 10, "temperature": 310.15, "rate_method": "Metropolis"}"#,
        )
        .unwrap();

        assert_eq!(fields.get("num_simulations"), Some(&RawValue::Int(10)));
        assert_eq!(fields.get("temperature"), Some(&RawValue::Float(310.15)));
        assert_eq!(fields.get("rate_method").and_then(RawValue::as_str), Some("Metropolis"));
    }

    #[test]
    fn test_nested_maps_deserialize_in_order() {
        let value: RawValue =
            serde_json::from_str(r#"{"b": {"strands": ["x", "y"]}, "a": {"strands": ["z"]}}"#)
                .unwrap();

        let map = value.as_map().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map["b"].as_map().unwrap()["strands"].kind(), ValueKind::List);
    }

    #[test]
    fn test_canonical_bytes_distinguish_types_and_order() {
        let a = RawFields::new().with("x", 1).canonical_bytes();
        let b = RawFields::new().with("x", 1.0).canonical_bytes();
        assert_ne!(a, b);

        let ab = RawFields::new().with("a", 1).with("b", 2).canonical_bytes();
        let ba = RawFields::new().with("b", 2).with("a", 1).canonical_bytes();
        assert_ne!(ab, ba);
        assert_eq!(ab, RawFields::new().with("a", 1).with("b", 2).canonical_bytes());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(RawValue::from(true).kind().to_string(), "bool");
        assert_eq!(RawValue::from(3).kind().to_string(), "integer");
        assert_eq!(RawValue::list(["a", "b"]).kind().to_string(), "list");
    }
}
