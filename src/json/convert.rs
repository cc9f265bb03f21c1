//! Purpose: serde interoperability for `JsonValue`.
//! Exports: `Serialize`/`Deserialize` impls and `From<serde_json::Value>`.
//! Role: Lets `JsonValue` sit inside serde data structures and accept serde_json trees.
//! Invariants: Deserialization uses the same duplicate-key rule as the parsers.
//! Invariants: Integral numbers within the safe range serialize as integers.
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::core::map::Map;
use crate::core::value::{JsonValue, MAX_SAFE_INTEGER};

// Key serde_json uses to smuggle arbitrary-precision number text through `visit_map`.
const NUMBER_TOKEN: &str = "$serde_json::private::Number";

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(val) => JsonValue::Bool(val),
            serde_json::Value::Number(num) => JsonValue::Number(number_to_f64(&num)),
            serde_json::Value::String(text) => JsonValue::String(text),
            serde_json::Value::Array(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            serde_json::Value::Object(map) => JsonValue::Object(
                map.into_iter()
                    .map(|(key, item)| (key, JsonValue::from(item)))
                    .collect(),
            ),
        }
    }
}

fn number_to_f64(num: &serde_json::Number) -> f64 {
    if let Some(val) = num.as_f64() {
        return val;
    }
    // `as_f64` filters out overflow; out-of-range magnitudes saturate to a signed infinity.
    let text = num.to_string();
    text.parse().unwrap_or(if text.starts_with('-') {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    })
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(val) => serializer.serialize_bool(*val),
            JsonValue::Number(num) if num.fract() == 0.0 && num.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*num as i64)
            }
            JsonValue::Number(num) => serializer.serialize_f64(*num),
            JsonValue::String(text) => serializer.serialize_str(text),
            JsonValue::Array(items) => serializer.collect_seq(items),
            JsonValue::Object(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = JsonValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<JsonValue, E> {
        Ok(JsonValue::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<JsonValue, E> {
        Ok(JsonValue::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<JsonValue, E> {
        Ok(JsonValue::Number(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<JsonValue, E> {
        Ok(JsonValue::Number(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<JsonValue, E> {
        Ok(JsonValue::from(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<JsonValue, E> {
        Ok(JsonValue::String(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<JsonValue, D::Error> {
        JsonValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<JsonValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(JsonValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<JsonValue, A::Error> {
        let mut map = Map::new();
        while let Some(key) = access.next_key::<String>()? {
            if map.is_empty() && key == NUMBER_TOKEN {
                let text: String = access.next_value()?;
                return text
                    .parse::<f64>()
                    .map(JsonValue::Number)
                    .map_err(de::Error::custom);
            }
            let value: JsonValue = access.next_value()?;
            map.insert(key, value);
        }
        Ok(JsonValue::Object(map))
    }
}
