//! Purpose: Engine-neutral in-memory JSON value tree.
//! Exports: `JsonValue`, `JsonKind`, `MAX_SAFE_INTEGER`.
//! Role: The only data model application code sees, whichever engine parsed it.
//! Invariants: Numbers are always `f64`; integers beyond 2^53 are not preserved.
//! Invariants: Accessors never coerce between kinds; failure is `None` or a typed `Access` error.
//! Invariants: Equality is structural; object key order does not participate.
use std::fmt;

use crate::core::error::{Error, ErrorKind};
use crate::core::map::Map;

/// Largest integer an `f64` represents exactly along with all smaller ones (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "boolean",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Map),
}

impl JsonValue {
    pub fn kind(&self) -> JsonKind {
        match self {
            JsonValue::Null => JsonKind::Null,
            JsonValue::Bool(_) => JsonKind::Bool,
            JsonValue::Number(_) => JsonKind::Number,
            JsonValue::String(_) => JsonKind::String,
            JsonValue::Array(_) => JsonKind::Array,
            JsonValue::Object(_) => JsonKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, JsonValue::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the number as an integer when it is integral and within the
    /// exactly-representable range `±(2^53 - 1)`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JsonValue::Number(value)
                if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER =>
            {
                Some(*value as i64)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<JsonValue>> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            JsonValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            JsonValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Object field lookup; `None` for missing keys and for non-objects.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Array element lookup; `None` when out of bounds and for non-arrays.
    pub fn get_index(&self, index: usize) -> Option<&JsonValue> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Like [`JsonValue::get`], but reports why the lookup failed.
    pub fn field(&self, key: &str) -> Result<&JsonValue, Error> {
        let map = self.as_object().ok_or_else(|| self.kind_mismatch(JsonKind::Object))?;
        map.get(key).ok_or_else(|| {
            Error::new(ErrorKind::Access).with_message(format!("missing field {key:?}"))
        })
    }

    /// Like [`JsonValue::get_index`], but reports why the lookup failed.
    pub fn element(&self, index: usize) -> Result<&JsonValue, Error> {
        let items = self.as_array().ok_or_else(|| self.kind_mismatch(JsonKind::Array))?;
        items.get(index).ok_or_else(|| {
            Error::new(ErrorKind::Access).with_message(format!(
                "index {index} out of bounds for array of length {}",
                items.len()
            ))
        })
    }

    /// Number of nested containers on the deepest path: `0` for scalars, `1` for `[]`.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((value, level)) = pending.pop() {
            match value {
                JsonValue::Array(items) => {
                    deepest = deepest.max(level);
                    pending.extend(items.iter().map(|child| (child, level + 1)));
                }
                JsonValue::Object(map) => {
                    deepest = deepest.max(level);
                    pending.extend(map.values().map(|child| (child, level + 1)));
                }
                _ => {}
            }
        }
        deepest
    }

    fn kind_mismatch(&self, expected: JsonKind) -> Error {
        Error::new(ErrorKind::Access)
            .with_message(format!("value is {}", self.kind()))
            .with_expected(expected.as_str())
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Number(value)
    }
}

impl From<i32> for JsonValue {
    fn from(value: i32) -> Self {
        JsonValue::Number(f64::from(value))
    }
}

impl From<u32> for JsonValue {
    fn from(value: u32) -> Self {
        JsonValue::Number(f64::from(value))
    }
}

/// Lossy above 2^53, like every number in this model.
impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Number(value as f64)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(value: Vec<JsonValue>) -> Self {
        JsonValue::Array(value)
    }
}

impl From<Map> for JsonValue {
    fn from(value: Map) -> Self {
        JsonValue::Object(value)
    }
}

impl FromIterator<JsonValue> for JsonValue {
    fn from_iter<I: IntoIterator<Item = JsonValue>>(iter: I) -> Self {
        JsonValue::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, JsonValue)> for JsonValue {
    fn from_iter<I: IntoIterator<Item = (K, JsonValue)>>(iter: I) -> Self {
        JsonValue::Object(iter.into_iter().collect())
    }
}
