//! Purpose: Encode `JsonValue` trees through serde_json.
//! Exports: `to_string`.
//! Role: Serializer half of the serde engine.
//! Invariants: Number text comes from `format_number`, carried verbatim via arbitrary-precision numbers.
//! Invariants: Escaping and pretty layout match the native writer byte for byte.
//! Invariants: Deep trees are converted and encoded on a stack sized to their depth.

use crate::core::error::{Error, ErrorKind};
use crate::core::number::{NonFinitePolicy, format_number};
use crate::core::serialize::{Location, Segment, SerializeOptions, non_finite_error};
use crate::core::value::JsonValue;
use crate::json::stack::with_stack_for;

pub(crate) fn to_string(value: &JsonValue, options: &SerializeOptions) -> Result<String, Error> {
    with_stack_for(value.depth(), || encode(value, options))
}

fn encode(value: &JsonValue, options: &SerializeOptions) -> Result<String, Error> {
    let mut location = Location::default();
    let tree = to_serde_value(value, options.non_finite, &mut location)?;
    let encoded = if options.pretty {
        serde_json::to_string_pretty(&tree)
    } else {
        serde_json::to_string(&tree)
    };
    encoded.map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("serde_json failed to encode value")
            .with_source(err)
    })
}

fn to_serde_value(
    value: &JsonValue,
    policy: NonFinitePolicy,
    location: &mut Location,
) -> Result<serde_json::Value, Error> {
    let converted = match value {
        JsonValue::Null => serde_json::Value::Null,
        JsonValue::Bool(val) => serde_json::Value::Bool(*val),
        JsonValue::Number(num) => match format_number(*num) {
            Some(text) => serde_json::Value::Number(text.parse().map_err(|err| {
                Error::new(ErrorKind::Internal)
                    .with_message(format!("canonical number {text:?} rejected by serde_json"))
                    .with_location(location.to_string())
                    .with_source(err)
            })?),
            None => match policy {
                NonFinitePolicy::Null => serde_json::Value::Null,
                NonFinitePolicy::Reject => return Err(non_finite_error(*num, location)),
            },
        },
        JsonValue::String(text) => serde_json::Value::String(text.clone()),
        JsonValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                location.push(Segment::Index(idx));
                out.push(to_serde_value(item, policy, location)?);
                location.pop();
            }
            serde_json::Value::Array(out)
        }
        JsonValue::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, item) in map {
                location.push(Segment::Key(key.clone()));
                out.insert(key.clone(), to_serde_value(item, policy, location)?);
                location.pop();
            }
            serde_json::Value::Object(out)
        }
    };
    Ok(converted)
}
