//! Purpose: Define the stable public Rust API boundary for portable-json.
//! Exports: Value model, parser/serializer traits, engines, configuration, and bindings.
//! Role: Public, additive-only surface; hides engine internals.
//! Invariants: Application code can do everything through this module alone.
//! Invariants: Nothing here branches on which engine is installed.

mod bindings;
mod config;
mod engine;

pub use crate::core::error::{Error, ErrorKind};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::map::Map;
pub use crate::core::number::{NonFinitePolicy, format_number};
pub use crate::core::parse::{DEFAULT_MAX_DEPTH, ParseOptions};
pub use crate::core::serialize::{
    SerializeOptions, Style, Token, to_string_styled, write_escaped_str,
};
pub use crate::core::value::{JsonKind, JsonValue, MAX_SAFE_INTEGER};
pub use bindings::{Bindings, Registry, install, installed};
pub use config::{EngineConfig, EngineKind};
pub use engine::{JsonParser, JsonSerializer, NativeEngine, SerdeEngine};
