//! Purpose: Decode JSON text through serde_json into `JsonValue`.
//! Exports: `from_str`, `check_depth`, `categorize_error`, `categorize_message`,
//! `expected_for_message`.
//! Role: Parser half of the serde engine; maps serde_json failures onto `ErrorKind`.
//! Invariants: Nesting is bounded by a byte pre-scan before serde_json recurses.
//! Invariants: The pre-scan's depth sizes the stack serde_json runs on.
//! Invariants: Every mapped parse failure names what was expected, like the native parser.
//! Invariants: serde_json's own recursion limit is disabled so `max_depth` alone decides.
//! Notes: When input is both malformed and too deep, the pre-scan reports `DepthExceeded` first.

use serde::Deserialize;
use serde_json::error::Category;

use crate::core::error::{Error, ErrorKind};
use crate::core::parse::{ParseOptions, depth_exceeded};
use crate::core::value::JsonValue;
use crate::json::stack::with_stack_for;

pub(crate) fn from_str(input: &str, options: &ParseOptions) -> Result<JsonValue, Error> {
    let depth = check_depth(input.as_bytes(), options.max_depth)?;
    with_stack_for(depth, || decode(input))
}

fn decode(input: &str) -> Result<JsonValue, Error> {
    let mut de = serde_json::Deserializer::from_str(input);
    de.disable_recursion_limit();
    let value = serde_json::Value::deserialize(&mut de).map_err(|err| map_error(err, input))?;
    de.end().map_err(|err| map_error(err, input))?;
    Ok(JsonValue::from(value))
}

/// Fails when any array/object opens while `max_depth` containers are already open.
///
/// Returns the deepest nesting seen.
pub(crate) fn check_depth(bytes: &[u8], max_depth: usize) -> Result<usize, Error> {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, &byte) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                if depth >= max_depth {
                    return Err(depth_exceeded(offset, max_depth));
                }
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(deepest)
}

pub(crate) fn categorize_error(err: &serde_json::Error) -> ErrorKind {
    match err.classify() {
        Category::Io => ErrorKind::Internal,
        Category::Syntax | Category::Eof | Category::Data => categorize_message(&err.to_string()),
    }
}

pub(crate) fn categorize_message(message: &str) -> ErrorKind {
    let lower = message.to_ascii_lowercase();
    if lower.starts_with("trailing characters") {
        ErrorKind::TrailingData
    } else {
        ErrorKind::Syntax
    }
}

fn map_error(err: serde_json::Error, input: &str) -> Error {
    let kind = categorize_error(&err);
    let rendered = err.to_string();
    let message = match rendered.rsplit_once(" at line ") {
        Some((head, _)) => head.to_string(),
        None => rendered,
    };
    let mut mapped = Error::new(kind).with_expected(expected_for_message(&message));
    if err.line() > 0 {
        mapped = mapped.with_offset(byte_offset(input, err.line(), err.column()));
    }
    mapped.with_message(message).with_source(err)
}

// serde_json message prefixes and the token the native parser names for the same failure.
const EXPECTED_BY_MESSAGE: &[(&str, &str)] = &[
    ("trailing characters", "end of input"),
    ("expected `,` or `]`", "',' or ']'"),
    ("expected `,` or `}`", "',' or '}'"),
    ("eof while parsing a list", "',' or ']'"),
    ("eof while parsing an object", "',' or '}'"),
    ("expected `:`", "':'"),
    ("key must be a string", "string key"),
    ("eof while parsing a string", "closing '\"'"),
    ("expected `\"`", "closing '\"'"),
    ("control character", "escape sequence"),
    ("invalid escape", "escape character"),
    ("unexpected end of hex escape", "hex digit"),
    ("lone leading surrogate", "surrogate pair"),
    ("invalid unicode code point", "surrogate pair"),
    ("invalid number", "digit"),
    ("number out of range", "digit"),
    ("expected ident", "literal"),
];

/// Falls back to `value`, which covers serde_json's "expected value", trailing comma and EOF cases.
pub(crate) fn expected_for_message(message: &str) -> &'static str {
    let lower = message.to_ascii_lowercase();
    EXPECTED_BY_MESSAGE
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
        .map_or("value", |(_, expected)| *expected)
}

/// Converts serde_json's 1-based line/column into a byte offset.
fn byte_offset(input: &str, line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        input
            .match_indices('\n')
            .nth(line - 2)
            .map_or(input.len(), |(idx, _)| idx + 1)
    };
    (line_start + column.saturating_sub(1)).min(input.len())
}
