//! Purpose: Native JSON writer for `JsonValue` trees.
//! Exports: `SerializeOptions`, `Style`, `Token`, `to_string`, `to_string_styled`,
//! `write_escaped_str`.
//! Role: Reference serializer; other engines must emit the same bytes.
//! Role: The one definition of pretty layout; styled output (CLI color) reuses the same walk.
//! Invariants: Object keys are written in stored insertion order.
//! Invariants: Non-ASCII passes through as raw UTF-8; only `"`, `\`, and C0 controls are escaped.
//! Invariants: Pretty output differs from compact output in whitespace only.
//! Invariants: Non-finite numbers follow `NonFinitePolicy`; invalid JSON is never emitted.
//! Notes: Open containers live on a heap stack; call depth does not grow with nesting.
use std::fmt;
use std::iter::Enumerate;
use std::slice;

use indexmap::map::Iter as EntryIter;

use crate::core::error::{Error, ErrorKind};
use crate::core::number::{NonFinitePolicy, describe_non_finite, format_number};
use crate::core::value::JsonValue;

const INDENT: &str = "  ";
const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SerializeOptions {
    pub pretty: bool,
    pub non_finite: NonFinitePolicy,
}

impl SerializeOptions {
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn non_finite(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }
}

/// Token classes the writer hands to a `Style`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Token {
    Key,
    String,
    Number,
    Bool,
    Null,
    /// Brackets, braces, `,` and `:`.
    Punct,
}

/// Decorates tokens as they are written. Layout whitespace is never passed through a style.
pub trait Style {
    fn before(&mut self, _token: Token, _out: &mut String) {}
    fn after(&mut self, _token: Token, _out: &mut String) {}
}

struct Plain;

impl Style for Plain {}

pub fn to_string(value: &JsonValue, options: &SerializeOptions) -> Result<String, Error> {
    to_string_styled(value, options, &mut Plain)
}

/// Like `to_string`, wrapping every token with `style`.
pub fn to_string_styled<S: Style + ?Sized>(
    value: &JsonValue,
    options: &SerializeOptions,
    style: &mut S,
) -> Result<String, Error> {
    let mut writer = Writer {
        options,
        style,
        out: String::new(),
        location: Location::default(),
    };
    writer.write(value)?;
    Ok(writer.out)
}

/// Appends `text` as a quoted JSON string literal.
pub fn write_escaped_str(text: &str, out: &mut String) {
    out.push('"');
    let bytes = text.as_bytes();
    let mut start = 0;
    for (idx, &byte) in bytes.iter().enumerate() {
        let escape: &str = match byte {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x08 => "\\b",
            0x0c => "\\f",
            0x00..=0x1f => "",
            _ => continue,
        };
        // Escaped bytes are all ASCII, so `idx` is always a char boundary.
        out.push_str(&text[start..idx]);
        if escape.is_empty() {
            out.push_str("\\u00");
            out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
            out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
        } else {
            out.push_str(escape);
        }
        start = idx + 1;
    }
    out.push_str(&text[start..]);
    out.push('"');
}

pub(crate) fn non_finite_error(value: f64, location: &Location) -> Error {
    Error::new(ErrorKind::InvalidNumericValue)
        .with_message(format!(
            "{} is not representable in JSON",
            describe_non_finite(value)
        ))
        .with_location(location.to_string())
        .with_hint("Use the `null` non-finite policy to emit null instead.")
}

/// A non-empty container with children still to write.
enum Frame<'v> {
    Array(Enumerate<slice::Iter<'v, JsonValue>>),
    Object(Enumerate<EntryIter<'v, String, JsonValue>>),
}

impl<'v> Frame<'v> {
    fn next_child(&mut self) -> Option<(usize, Segment, &'v JsonValue)> {
        match self {
            Frame::Array(items) => items
                .next()
                .map(|(idx, item)| (idx, Segment::Index(idx), item)),
            Frame::Object(entries) => entries
                .next()
                .map(|(idx, (key, item))| (idx, Segment::Key(key.clone()), item)),
        }
    }

    fn close(&self) -> &'static str {
        match self {
            Frame::Array(_) => "]",
            Frame::Object(_) => "}",
        }
    }
}

struct Writer<'a, S: ?Sized> {
    options: &'a SerializeOptions,
    style: &'a mut S,
    out: String,
    location: Location,
}

impl<S: Style + ?Sized> Writer<'_, S> {
    fn write<'v>(&mut self, root: &'v JsonValue) -> Result<(), Error> {
        let mut stack: Vec<Frame<'v>> = Vec::new();
        let mut next = Some(root);
        loop {
            if let Some(value) = next.take() {
                self.write_value(value, &mut stack)?;
            }
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else {
                return Ok(());
            };
            match frame.next_child() {
                Some((idx, segment, child)) => {
                    if idx > 0 {
                        self.location.pop();
                        self.token(Token::Punct, ",");
                    }
                    self.newline(depth);
                    if let Segment::Key(key) = &segment {
                        self.escaped(Token::Key, key);
                        self.token(Token::Punct, ":");
                        if self.options.pretty {
                            self.out.push(' ');
                        }
                    }
                    self.location.push(segment);
                    next = Some(child);
                }
                None => {
                    let close = frame.close();
                    stack.pop();
                    self.location.pop();
                    self.newline(depth - 1);
                    self.token(Token::Punct, close);
                }
            }
        }
    }

    /// Writes a scalar or empty container whole; opens a frame for anything else.
    fn write_value<'v>(
        &mut self,
        value: &'v JsonValue,
        stack: &mut Vec<Frame<'v>>,
    ) -> Result<(), Error> {
        match value {
            JsonValue::Null => self.token(Token::Null, "null"),
            JsonValue::Bool(val) => self.token(Token::Bool, if *val { "true" } else { "false" }),
            JsonValue::Number(num) => self.write_number(*num)?,
            JsonValue::String(text) => self.escaped(Token::String, text),
            JsonValue::Array(items) if items.is_empty() => self.token(Token::Punct, "[]"),
            JsonValue::Array(items) => {
                self.token(Token::Punct, "[");
                stack.push(Frame::Array(items.iter().enumerate()));
            }
            JsonValue::Object(map) if map.is_empty() => self.token(Token::Punct, "{}"),
            JsonValue::Object(map) => {
                self.token(Token::Punct, "{");
                stack.push(Frame::Object(map.iter().enumerate()));
            }
        }
        Ok(())
    }

    fn write_number(&mut self, num: f64) -> Result<(), Error> {
        match format_number(num) {
            Some(text) => self.token(Token::Number, &text),
            None => match self.options.non_finite {
                NonFinitePolicy::Null => self.token(Token::Null, "null"),
                NonFinitePolicy::Reject => return Err(non_finite_error(num, &self.location)),
            },
        }
        Ok(())
    }

    fn token(&mut self, token: Token, text: &str) {
        self.style.before(token, &mut self.out);
        self.out.push_str(text);
        self.style.after(token, &mut self.out);
    }

    fn escaped(&mut self, token: Token, text: &str) {
        self.style.before(token, &mut self.out);
        write_escaped_str(text, &mut self.out);
        self.style.after(token, &mut self.out);
    }

    fn newline(&mut self, indent: usize) {
        if !self.options.pretty {
            return;
        }
        self.out.push('\n');
        for _ in 0..indent {
            self.out.push_str(INDENT);
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Segment {
    Key(String),
    Index(usize),
}

/// Path from the root to the value being written, rendered like `$.a["b c"][2]`.
#[derive(Clone, Debug, Default)]
pub(crate) struct Location {
    segments: Vec<Segment>,
}

impl Location {
    pub(crate) fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) if is_identifier(key) => write!(f, ".{key}")?,
                Segment::Key(key) => {
                    let mut quoted = String::new();
                    write_escaped_str(key, &mut quoted);
                    write!(f, "[{quoted}]")?;
                }
                Segment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}
