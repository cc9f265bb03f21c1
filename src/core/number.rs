//! Purpose: Canonical text form for JSON numbers and the non-finite policy.
//! Exports: `NonFinitePolicy`, `format_number`.
//! Role: Shared by every serializer engine so number text is byte-identical across engines.
//! Invariants: Zero (including -0) renders as `0`.
//! Invariants: Magnitudes in [1e-6, 1e21) render without exponent; others use exponent form.
//! Invariants: Digits are the shortest that round-trip through `f64` parsing.
use serde::{Deserialize, Serialize};

/// What a serializer does with NaN and infinities, which JSON cannot express.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonFinitePolicy {
    /// Fail with `InvalidNumericValue`.
    #[default]
    Reject,
    /// Emit `null` in place of the number.
    Null,
}

/// Formats a finite number; returns `None` for NaN and infinities.
pub fn format_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        Some(format!("{value}"))
    } else {
        Some(format!("{value:e}"))
    }
}

pub(crate) fn describe_non_finite(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}
