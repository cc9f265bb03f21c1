//! Purpose: `serde_json`-backed engine internals and serde interoperability for `JsonValue`.
//! Exports: `parse` (decode + error categorisation), `write` (encode), serde impls in `convert`.
//! Role: Single seam for serde_json usage so the rest of the crate stays engine-neutral.
//! Invariants: Output and error kinds match the native engine for the same input.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).
//! Notes: serde_json recurses per nesting level; `stack` sizes the thread that runs it.

mod convert;
pub(crate) mod parse;
mod stack;
pub(crate) mod write;
