//! Purpose: Render pretty JSON with ANSI colorization for CLI output.
//! Exports: colorize_json.
//! Role: Palette only; layout comes from the native writer's styled walk.
//! Invariants: Stripping the escapes yields exactly the pretty serialization.
//! Invariants: Non-finite numbers follow the configured policy, as in plain output.
use portable_json::api::{Error, JsonValue, SerializeOptions, Style, Token, to_string_styled};

// Conservative 8/16-color palette for broad terminal compatibility.
// Avoid bright variants that can lose contrast on themes like Solarized.
const COLOR_KEY: &str = "36";
const COLOR_STRING: &str = "32";
const COLOR_NUMBER: &str = "33";
const COLOR_BOOL: &str = "35";
const COLOR_NULL: &str = "39";
const COLOR_PUNCT: &str = "39";

struct Ansi;

impl Style for Ansi {
    fn before(&mut self, token: Token, out: &mut String) {
        let color = match token {
            Token::Key => COLOR_KEY,
            Token::String => COLOR_STRING,
            Token::Number => COLOR_NUMBER,
            Token::Bool => COLOR_BOOL,
            Token::Null => COLOR_NULL,
            Token::Punct => COLOR_PUNCT,
        };
        out.push_str("\u{1b}[");
        out.push_str(color);
        out.push('m');
    }

    fn after(&mut self, _token: Token, out: &mut String) {
        out.push_str("\u{1b}[0m");
    }
}

pub fn colorize_json(value: &JsonValue, options: SerializeOptions) -> Result<String, Error> {
    to_string_styled(value, &options.pretty(true), &mut Ansi)
}
