//! Purpose: Engine-neutral JSON value model with interchangeable parser/serializer engines.
//! Exports: `api` (stable surface), `core` (value model, native parser and writer, errors).
//! Role: Library backing the `portable-json` host binary and embedding applications.
//! Invariants: Every engine yields equal values, identical text, and identical error kinds.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
mod json;
