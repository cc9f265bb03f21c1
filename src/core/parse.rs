//! Purpose: Native JSON parser producing `JsonValue` trees.
//! Exports: `ParseOptions`, `DEFAULT_MAX_DEPTH`, `from_str`, `from_slice`, `decode_utf8`.
//! Role: Reference parser; other engines must accept, reject, and classify the same inputs.
//! Invariants: Strict RFC 8259 grammar; no comments, trailing commas, or BOM.
//! Invariants: Nesting beyond `max_depth` fails at the opening bracket.
//! Invariants: Open containers live on a heap stack, so call depth is constant in nesting depth.
//! Invariants: Duplicate keys keep the first-seen position with the last value.
//! Invariants: Failures never return a partial value.
use crate::core::error::{Error, ErrorKind};
use crate::core::map::Map;
use crate::core::value::JsonValue;

pub const DEFAULT_MAX_DEPTH: usize = 1000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseOptions {
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Validates UTF-8, reporting the offset of the first invalid byte.
pub fn decode_utf8(input: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(input).map_err(|err| {
        Error::new(ErrorKind::Encoding)
            .with_message("input is not valid UTF-8")
            .with_offset(err.valid_up_to())
            .with_source(err)
    })
}

pub(crate) fn depth_exceeded(offset: usize, max_depth: usize) -> Error {
    Error::new(ErrorKind::DepthExceeded)
        .with_message(format!("nesting deeper than {max_depth} levels"))
        .with_offset(offset)
        .with_limit(max_depth)
}

pub fn from_slice(input: &[u8], options: &ParseOptions) -> Result<JsonValue, Error> {
    from_str(decode_utf8(input)?, options)
}

pub fn from_str(input: &str, options: &ParseOptions) -> Result<JsonValue, Error> {
    let mut parser = Parser {
        text: input,
        bytes: input.as_bytes(),
        pos: 0,
        max_depth: options.max_depth,
    };
    let value = parser.parse_root()?;
    parser.skip_ws();
    if parser.pos < parser.bytes.len() {
        return Err(Error::new(ErrorKind::TrailingData)
            .with_message("unexpected content after top-level value")
            .with_expected("end of input")
            .with_offset(parser.pos));
    }
    Ok(value)
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    max_depth: usize,
}

/// A container whose closing bracket has not been read yet.
enum Frame {
    Array(Vec<JsonValue>),
    /// `key` is the member whose value is being parsed.
    Object { map: Map, key: String },
}

impl Frame {
    fn into_value(self) -> JsonValue {
        match self {
            Frame::Array(items) => JsonValue::Array(items),
            Frame::Object { map, .. } => JsonValue::Object(map),
        }
    }
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn syntax_error(&self, message: impl Into<String>, expected: &str) -> Error {
        Error::new(ErrorKind::Syntax)
            .with_message(message)
            .with_expected(expected)
            .with_offset(self.pos)
    }

    fn unexpected(&self, expected: &str) -> Error {
        match self.text.get(self.pos..).and_then(|rest| rest.chars().next()) {
            Some(ch) => self.syntax_error(format!("unexpected character {ch:?}"), expected),
            None => self.syntax_error("unexpected end of input", expected),
        }
    }

    fn parse_root(&mut self) -> Result<JsonValue, Error> {
        let mut stack: Vec<Frame> = Vec::new();
        'value: loop {
            self.skip_ws();
            let mut value = match self.peek() {
                Some(b'[') => {
                    self.open(stack.len())?;
                    self.skip_ws();
                    if self.peek() == Some(b']') {
                        self.pos += 1;
                        JsonValue::Array(Vec::new())
                    } else {
                        stack.push(Frame::Array(Vec::new()));
                        continue 'value;
                    }
                }
                Some(b'{') => {
                    self.open(stack.len())?;
                    self.skip_ws();
                    if self.peek() == Some(b'}') {
                        self.pos += 1;
                        JsonValue::Object(Map::new())
                    } else {
                        let key = self.parse_key()?;
                        stack.push(Frame::Object {
                            map: Map::new(),
                            key,
                        });
                        continue 'value;
                    }
                }
                _ => self.parse_scalar()?,
            };

            // Attach the finished value, closing every container that ends right after it.
            loop {
                let Some(mut frame) = stack.pop() else {
                    return Ok(value);
                };
                self.skip_ws();
                let closed = match &mut frame {
                    Frame::Array(items) => {
                        items.push(value);
                        match self.peek() {
                            Some(b',') => false,
                            Some(b']') => true,
                            _ => return Err(self.unexpected("',' or ']'")),
                        }
                    }
                    Frame::Object { map, key } => {
                        map.insert(std::mem::take(key), value);
                        match self.peek() {
                            Some(b',') => false,
                            Some(b'}') => true,
                            _ => return Err(self.unexpected("',' or '}'")),
                        }
                    }
                };
                self.pos += 1;
                if !closed {
                    if let Frame::Object { key, .. } = &mut frame {
                        *key = self.parse_key()?;
                    }
                    stack.push(frame);
                    continue 'value;
                }
                value = frame.into_value();
            }
        }
    }

    fn parse_scalar(&mut self) -> Result<JsonValue, Error> {
        match self.peek() {
            Some(b'n') => self.parse_literal("null", JsonValue::Null),
            Some(b't') => self.parse_literal("true", JsonValue::Bool(true)),
            Some(b'f') => self.parse_literal("false", JsonValue::Bool(false)),
            Some(b'"') => self.parse_string().map(JsonValue::String),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            _ => Err(self.unexpected("value")),
        }
    }

    fn parse_literal(&mut self, literal: &str, value: JsonValue) -> Result<JsonValue, Error> {
        let rest = &self.bytes[self.pos..];
        if rest.starts_with(literal.as_bytes()) {
            self.pos += literal.len();
            return Ok(value);
        }
        let matched = rest
            .iter()
            .zip(literal.as_bytes())
            .take_while(|(got, want)| got == want)
            .count();
        self.pos += matched;
        Err(self.unexpected(&format!("'{literal}'")))
    }

    /// Consumes an opening bracket when fewer than `max_depth` containers are open.
    fn open(&mut self, open: usize) -> Result<(), Error> {
        if open >= self.max_depth {
            return Err(depth_exceeded(self.pos, self.max_depth));
        }
        self.pos += 1;
        Ok(())
    }

    /// Reads `"key"` and the `:` after it.
    fn parse_key(&mut self) -> Result<String, Error> {
        self.skip_ws();
        if self.peek() != Some(b'"') {
            return Err(self.unexpected("string key"));
        }
        let key = self.parse_string()?;
        self.skip_ws();
        if self.peek() != Some(b':') {
            return Err(self.unexpected("':'"));
        }
        self.pos += 1;
        Ok(key)
    }

    fn parse_string(&mut self) -> Result<String, Error> {
        self.pos += 1;
        let mut out = String::new();
        let mut run_start = self.pos;
        loop {
            let Some(byte) = self.peek() else {
                return Err(self.unexpected("closing '\"'"));
            };
            // Every byte matched below is ASCII, so slicing at `pos` stays on a char boundary.
            match byte {
                b'"' => {
                    out.push_str(&self.text[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                b'\\' => {
                    out.push_str(&self.text[run_start..self.pos]);
                    self.pos += 1;
                    self.parse_escape(&mut out)?;
                    run_start = self.pos;
                }
                0x00..=0x1f => {
                    return Err(self.syntax_error(
                        format!("unescaped control character U+{byte:04X} in string"),
                        "escape sequence",
                    ));
                }
                _ => self.pos += 1,
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), Error> {
        let ch = match self.peek() {
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\u{8}',
            Some(b'f') => '\u{c}',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => {
                self.pos += 1;
                out.push(self.parse_unicode_escape()?);
                return Ok(());
            }
            _ => return Err(self.unexpected("escape character")),
        };
        self.pos += 1;
        out.push(ch);
        Ok(())
    }

    /// Decodes `XXXX` (and a following `\uXXXX` low surrogate when needed).
    fn parse_unicode_escape(&mut self) -> Result<char, Error> {
        let escape_start = self.pos - 2;
        let unpaired = || {
            Error::new(ErrorKind::Syntax)
                .with_message("unpaired UTF-16 surrogate in \\u escape")
                .with_expected("surrogate pair")
                .with_offset(escape_start)
        };
        let first = self.parse_hex4()?;
        let code = match first {
            0xD800..=0xDBFF => {
                if !self.bytes[self.pos..].starts_with(b"\\u") {
                    return Err(unpaired());
                }
                self.pos += 2;
                let second = self.parse_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return Err(unpaired());
                }
                0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(unpaired()),
            _ => first,
        };
        char::from_u32(code).ok_or_else(unpaired)
    }

    fn parse_hex4(&mut self) -> Result<u32, Error> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = match self.peek() {
                Some(byte @ b'0'..=b'9') => byte - b'0',
                Some(byte @ b'a'..=b'f') => byte - b'a' + 10,
                Some(byte @ b'A'..=b'F') => byte - b'A' + 10,
                _ => return Err(self.unexpected("hex digit")),
            };
            code = (code << 4) | u32::from(digit);
            self.pos += 1;
        }
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<JsonValue, Error> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if let Some(b'0'..=b'9') = self.peek() {
                    return Err(
                        self.syntax_error("leading zeros are not allowed", "'.' or exponent")
                    );
                }
            }
            Some(b'1'..=b'9') => self.skip_digits(),
            _ => return Err(self.unexpected("digit")),
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.expect_digits()?;
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            self.expect_digits()?;
        }
        let literal = &self.text[start..self.pos];
        // Out-of-range magnitudes saturate to infinity and excess digits round; neither is an error.
        literal.parse::<f64>().map(JsonValue::Number).map_err(|err| {
            Error::new(ErrorKind::Syntax)
                .with_message(format!("invalid number {literal:?}"))
                .with_expected("digit")
                .with_offset(start)
                .with_source(err)
        })
    }

    fn expect_digits(&mut self) -> Result<(), Error> {
        match self.peek() {
            Some(b'0'..=b'9') => {
                self.skip_digits();
                Ok(())
            }
            _ => Err(self.unexpected("digit")),
        }
    }

    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
    }
}
