//! Session payload values.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;

/// A session payload: field name to value.
pub type Payload = BTreeMap<String, Value>;

/// A value stored in a session payload.
///
/// Serialized untagged, so a payload is a plain JSON object in the cache.
/// Integers that do not fit `i64` decode as [`Value::Float`]. JSON has no
/// NaN or infinity, so `From<f64>` stores those as [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Convert any serializable value into a payload value.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(value)?)
    }

    /// Decode this value into a concrete type.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Value::Float(value)
        } else {
            Value::Null
        }
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Read-only accessor that coerces a possibly missing payload value.
///
/// Accessors return `None` when the value is absent or of another kind; the
/// `*_or` variants substitute a default instead.
#[derive(Debug, Clone, Copy)]
pub struct Caster<'a> {
    value: Option<&'a Value>,
}

impl<'a> Caster<'a> {
    pub fn new(value: Option<&'a Value>) -> Self {
        Self { value }
    }

    /// The wrapped value, if present.
    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }

    /// True when the value is missing or `null`.
    pub fn is_nil(&self) -> bool {
        self.value.is_none_or(Value::is_null)
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self.value {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn string_or(&self, default: &str) -> String {
        self.as_str().unwrap_or(default).to_string()
    }

    pub fn int(&self) -> Option<i64> {
        match self.value {
            Some(Value::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn int_or(&self, default: i64) -> i64 {
        self.int().unwrap_or(default)
    }

    /// Floats accept integer values too.
    pub fn float(&self) -> Option<f64> {
        match self.value {
            Some(Value::Float(f)) => Some(*f),
            Some(Value::Int(i)) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn float_or(&self, default: f64) -> f64 {
        self.float().unwrap_or(default)
    }

    pub fn bool(&self) -> Option<bool> {
        match self.value {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn bool_or(&self, default: bool) -> bool {
        self.bool().unwrap_or(default)
    }

    pub fn list(&self) -> Option<&'a [Value]> {
        match self.value {
            Some(Value::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn map(&self) -> Option<&'a BTreeMap<String, Value>> {
        match self.value {
            Some(Value::Map(map)) => Some(map),
            _ => None,
        }
    }

    /// Decode into any deserializable type, `None` on mismatch.
    pub fn typed<T: DeserializeOwned>(&self) -> Option<T> {
        self.value.and_then(|v| v.to_typed().ok())
    }
}
