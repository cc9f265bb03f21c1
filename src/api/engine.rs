//! Purpose: Parser/serializer capability traits and the two shipped engines.
//! Exports: `JsonParser`, `JsonSerializer`, `NativeEngine`, `SerdeEngine`.
//! Role: Abstract seam between engine-neutral callers and a concrete JSON engine.
//! Invariants: Engines are stateless apart from immutable options; `Send + Sync`.
//! Invariants: Both engines accept, reject, and emit identically for the same options.
use std::fmt;

use crate::api::config::EngineKind;
use crate::core::error::Error;
use crate::core::parse::{self, ParseOptions, decode_utf8};
use crate::core::serialize::{self, SerializeOptions};
use crate::core::value::JsonValue;
use crate::json;

pub trait JsonParser: Send + Sync + fmt::Debug {
    fn parse(&self, text: &str) -> Result<JsonValue, Error>;

    /// Parses raw bytes; invalid UTF-8 fails with `Encoding`.
    fn parse_slice(&self, bytes: &[u8]) -> Result<JsonValue, Error> {
        self.parse(decode_utf8(bytes)?)
    }
}

pub trait JsonSerializer: Send + Sync + fmt::Debug {
    fn serialize(&self, value: &JsonValue) -> Result<String, Error>;
}

/// Hand-written engine; open containers live on an explicit stack.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NativeEngine {
    parse: ParseOptions,
    serialize: SerializeOptions,
}

impl NativeEngine {
    pub fn new(parse: ParseOptions, serialize: SerializeOptions) -> Self {
        Self { parse, serialize }
    }
}

impl JsonParser for NativeEngine {
    fn parse(&self, text: &str) -> Result<JsonValue, Error> {
        parse::from_str(text, &self.parse)
            .inspect_err(|err| log_rejected(EngineKind::Native, err))
    }
}

impl JsonSerializer for NativeEngine {
    fn serialize(&self, value: &JsonValue) -> Result<String, Error> {
        serialize::to_string(value, &self.serialize)
            .inspect_err(|err| log_rejected(EngineKind::Native, err))
    }
}

/// Engine backed by serde_json. Deeply nested work runs on a scoped thread sized to its depth.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SerdeEngine {
    parse: ParseOptions,
    serialize: SerializeOptions,
}

impl SerdeEngine {
    pub fn new(parse: ParseOptions, serialize: SerializeOptions) -> Self {
        Self { parse, serialize }
    }
}

impl JsonParser for SerdeEngine {
    fn parse(&self, text: &str) -> Result<JsonValue, Error> {
        json::parse::from_str(text, &self.parse)
            .inspect_err(|err| log_rejected(EngineKind::SerdeJson, err))
    }
}

impl JsonSerializer for SerdeEngine {
    fn serialize(&self, value: &JsonValue) -> Result<String, Error> {
        json::write::to_string(value, &self.serialize)
            .inspect_err(|err| log_rejected(EngineKind::SerdeJson, err))
    }
}

// Kind and position only; payload text never reaches the log.
fn log_rejected(engine: EngineKind, err: &Error) {
    tracing::debug!(
        %engine,
        kind = err.kind().label(),
        offset = ?err.offset(),
        location = ?err.location(),
        "json engine rejected input"
    );
}

#[cfg(test)]
mod tests {
    use super::{JsonParser, JsonSerializer, NativeEngine, SerdeEngine};
    use crate::core::error::ErrorKind;
    use crate::core::parse::ParseOptions;
    use crate::core::serialize::SerializeOptions;

    fn engines() -> Vec<(&'static str, Box<dyn JsonParser>, Box<dyn JsonSerializer>)> {
        vec![
            (
                "native",
                Box::new(NativeEngine::default()),
                Box::new(NativeEngine::default()),
            ),
            (
                "serde",
                Box::new(SerdeEngine::default()),
                Box::new(SerdeEngine::default()),
            ),
        ]
    }

    #[test]
    fn parse_slice_rejects_invalid_utf8() {
        for (name, parser, _) in engines() {
            let err = parser.parse_slice(&[0xff, b'{', b'}']).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Encoding, "{name}");
            assert_eq!(err.offset(), Some(0), "{name}");
        }
    }

    #[test]
    fn round_trip_through_each_engine() {
        let input = r#"{"b":1,"a":[true,null,"x\ny"],"c":{"d":-0.5}}"#;
        for (name, parser, serializer) in engines() {
            let value = parser.parse(input).expect("parse");
            assert_eq!(serializer.serialize(&value).expect("serialize"), input, "{name}");
        }
    }

    #[test]
    fn options_are_honoured() {
        let engine = SerdeEngine::new(
            ParseOptions::default().max_depth(1),
            SerializeOptions::default().pretty(true),
        );
        assert_eq!(
            engine.parse("[[1]]").unwrap_err().kind(),
            ErrorKind::DepthExceeded
        );
        let value = engine.parse("[1]").expect("parse");
        assert_eq!(engine.serialize(&value).expect("serialize"), "[\n  1\n]");
    }
}
