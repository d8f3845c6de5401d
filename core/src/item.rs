//! Todo item model and its JSON encoding.
//!
//! Items are stored as loosely-typed attribute maps: the service writes
//! `id`, `text`, `checked`, `createdAt` and `updatedAt`, but whatever else
//! is in the table is read back and returned untouched.
//!
//! Numeric attributes are kept in their decimal text form ([`Number`]) so no
//! precision is lost on the way through. They are converted to JSON numbers
//! only when an item is serialized: integral values become JSON integers,
//! everything else a JSON float.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodeError;

pub const ID: &str = "id";
pub const TEXT: &str = "text";
pub const CHECKED: &str = "checked";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// Largest magnitude below which every integral `f64` maps to an exact `i64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A stored numeric attribute, kept as validated decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// Parses decimal text such as `"42"`, `"-1.5"` or `"1e3"`.
    pub fn parse(text: &str) -> Result<Self, EncodeError> {
        let trimmed = text.trim();
        let decimal_chars = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));

        match trimmed.parse::<f64>() {
            Ok(value) if decimal_chars && value.is_finite() => Ok(Self(trimmed.to_string())),
            _ => Err(EncodeError(text.to_string())),
        }
    }

    /// Epoch seconds with microsecond precision.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        let micros = at.timestamp_micros();
        let sign = if micros < 0 { "-" } else { "" };
        let magnitude = micros.unsigned_abs();
        Self(format!(
            "{sign}{}.{:06}",
            magnitude / 1_000_000,
            magnitude % 1_000_000
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn encoded(&self) -> Encoded {
        let text = self.0.as_str();

        if !text.contains(['.', 'e', 'E']) {
            if let Ok(value) = text.parse::<i64>() {
                return Encoded::Int(value);
            }
            if let Ok(value) = text.parse::<u64>() {
                return Encoded::UInt(value);
            }
        }

        // validated finite in `parse`
        let value: f64 = text.parse().unwrap_or_default();
        if value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
            Encoded::Int(value as i64)
        } else {
            Encoded::Float(value)
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

enum Encoded {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.encoded() {
            Encoded::Int(v) => serializer.serialize_i64(v),
            Encoded::UInt(v) => serializer.serialize_u64(v),
            Encoded::Float(v) => serializer.serialize_f64(v),
        }
    }
}

/// A single attribute value. Sets serialize as plain JSON arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    S(String),
    N(Number),
    L(Vec<AttrValue>),
    M(BTreeMap<String, AttrValue>),
    Ss(Vec<String>),
    Ns(Vec<Number>),
}

impl AttrValue {
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttrValue::S(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::S(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::S(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<Number> for AttrValue {
    fn from(value: Number) -> Self {
        AttrValue::N(value)
    }
}

/// One stored todo record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Item(BTreeMap<String, AttrValue>);

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    /// The `id` attribute, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.get(ID).and_then(AttrValue::as_s)
    }

    pub fn into_attributes(self) -> BTreeMap<String, AttrValue> {
        self.0
    }

    /// Applies `changes` and stamps `updatedAt`.
    pub fn apply(&mut self, changes: &TodoChanges, updated_at: Number) {
        if let Some(text) = &changes.text {
            self.insert(TEXT, text.as_str());
        }
        if let Some(checked) = changes.checked {
            self.insert(CHECKED, checked);
        }
        self.insert(UPDATED_AT, updated_at);
    }
}

impl FromIterator<(String, AttrValue)> for Item {
    fn from_iter<I: IntoIterator<Item = (String, AttrValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Request body for creating an item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTodo {
    pub text: String,
}

impl NewTodo {
    pub fn into_item(self, id: String, now: DateTime<Utc>) -> Item {
        let stamp = Number::from_timestamp(now);
        Item::new()
            .with(ID, id)
            .with(TEXT, self.text)
            .with(CHECKED, false)
            .with(CREATED_AT, stamp.clone())
            .with(UPDATED_AT, stamp)
    }
}

/// Request body for updating an item. Absent fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TodoChanges {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub checked: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.checked.is_none()
    }
}

/// Accepts `true`/`false` as JSON booleans or as strings.
fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(b)) => Ok(Some(b)),
        Some(Flag::Text(text)) => match text.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(de::Error::custom(format!(
                "invalid value for checked: {other:?}"
            ))),
        },
    }
}
