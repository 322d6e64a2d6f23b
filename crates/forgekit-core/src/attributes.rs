// ── Plain key/value attribute model ──
//
// The caller boundary: whatever drives forgekit (CLI, config file, another
// tool) hands in strings, ints, booleans and lists keyed by field name and
// gets the same shape back. The core never persists these.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use forgekit_api::InvalidId;

use crate::error::CoreError;

/// One attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Scalar rendered as text; `None` for lists.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::List(_) => None,
        }
    }

    /// Equality that treats `1` and `"1"` as the same value.
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(i), Self::String(s)) | (Self::String(s), Self::Int(i)) => {
                s.trim().parse::<i64>().is_ok_and(|parsed| parsed == *i)
            }
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_as(y))
            }
            _ => self == other,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            scalar => f.write_str(&scalar.as_text().unwrap_or_default()),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u16> for AttributeValue {
    fn from(v: u16) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for AttributeValue {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or_else(|_| Self::String(v.to_string()), Self::Int)
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<serde_json::Value> for AttributeValue {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;
        match value {
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .ok_or_else(|| format!("{n} is not an integer")),
            Value::String(s) => Ok(Self::String(s)),
            Value::Array(items) => items
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Null => Err("null is not a value".into()),
            Value::Object(_) => Err("nested objects are not supported".into()),
        }
    }
}

/// Ordered field-name → value map for one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttributeValue>);

impl Attributes {
    pub const ID: &'static str = "id";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object. `null` members are treated as unset.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        let serde_json::Value::Object(map) = value else {
            return Err(CoreError::attribute("<root>", "expected a JSON object"));
        };
        let mut attrs = Self::new();
        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            let value =
                AttributeValue::try_from(value).map_err(|reason| CoreError::attribute(&key, reason))?;
            attrs.0.insert(key, value);
        }
        Ok(attrs)
    }

    // ── Raw access ───────────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<AttributeValue>) {
        self.0.insert(key.to_owned(), value.into());
    }

    /// Set when `Some`, leave untouched when `None`.
    pub fn set_opt<V: Into<AttributeValue>>(&mut self, key: &str, value: Option<V>) {
        if let Some(v) = value {
            self.set(key, v);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // ── Typed getters ────────────────────────────────────────────────

    /// Scalar as text. Integers and booleans are accepted and rendered.
    pub fn string(&self, key: &str) -> Result<Option<String>, CoreError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_text()
                .map(Some)
                .ok_or_else(|| CoreError::attribute(key, "expected a string, got a list")),
        }
    }

    /// Non-empty text, or an error naming the field.
    pub fn require_string(&self, key: &str) -> Result<String, CoreError> {
        match self.string(key)? {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(CoreError::attribute(key, "is required")),
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, CoreError> {
        match self.get(key) {
            None => Ok(default),
            Some(AttributeValue::Bool(b)) => Ok(*b),
            Some(AttributeValue::String(s)) => s
                .parse()
                .map_err(|_| CoreError::attribute(key, format!("expected a bool, got '{s}'"))),
            Some(other) => Err(CoreError::attribute(
                key,
                format!("expected a bool, got {}", other.type_name()),
            )),
        }
    }

    /// Integer, accepting numeric strings.
    pub fn int(&self, key: &str) -> Result<Option<i64>, CoreError> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Int(i)) => Ok(Some(*i)),
            Some(AttributeValue::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| CoreError::attribute(key, format!("expected an integer, got '{s}'"))),
            Some(other) => Err(CoreError::attribute(
                key,
                format!("expected an integer, got {}", other.type_name()),
            )),
        }
    }

    /// Non-negative integer that fits a `u32`, or `default` when unset.
    pub fn u32_or(&self, key: &str, default: u32) -> Result<u32, CoreError> {
        match self.int(key)? {
            None => Ok(default),
            Some(i) => u32::try_from(i)
                .map_err(|_| CoreError::attribute(key, format!("{i} is out of range"))),
        }
    }

    /// List of scalars rendered as text. Unset means empty; a lone scalar
    /// is treated as a one-element list.
    pub fn strings(&self, key: &str) -> Result<Vec<String>, CoreError> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(AttributeValue::List(items)) => items
                .iter()
                .map(|v| {
                    v.as_text()
                        .ok_or_else(|| CoreError::attribute(key, "nested lists are not supported"))
                })
                .collect(),
            Some(scalar) => Ok(scalar.as_text().into_iter().collect()),
        }
    }

    /// Parse a typed identifier from an int or numeric string.
    pub fn parse_id<I>(&self, key: &str) -> Result<I, CoreError>
    where
        I: FromStr<Err = InvalidId>,
    {
        let raw = self
            .string(key)?
            .ok_or_else(|| CoreError::attribute(key, "is required"))?;
        Ok(raw.parse()?)
    }

    // ── Identifier helpers ───────────────────────────────────────────

    pub fn id<I>(&self) -> Result<I, CoreError>
    where
        I: FromStr<Err = InvalidId>,
    {
        self.parse_id(Self::ID)
    }

    pub fn set_id(&mut self, id: impl Into<u64>) {
        self.set(Self::ID, id.into());
    }

    pub fn clear_id(&mut self) {
        self.remove(Self::ID);
    }

    // ── Diffing ──────────────────────────────────────────────────────

    /// Fields whose value differs between `self` and `desired`, including
    /// fields present on only one side.
    pub fn changed_fields(&self, desired: &Attributes) -> BTreeSet<String> {
        self.0
            .keys()
            .chain(desired.0.keys())
            .filter(|k| match (self.0.get(*k), desired.0.get(*k)) {
                (Some(a), Some(b)) => !a.same_as(b),
                (a, b) => a != b,
            })
            .cloned()
            .collect()
    }

    /// Copy every field of `other` into `self`, overwriting.
    pub fn merge(&mut self, other: Attributes) {
        self.0.extend(other.0);
    }
}

impl FromIterator<(String, AttributeValue)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, AttributeValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Attributes {
    type Item = (String, AttributeValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
