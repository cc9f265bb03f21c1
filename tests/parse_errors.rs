//! Purpose: Regression coverage for error categorization and diagnostics.
//! Exports: Integration tests only.
//! Role: Verify stable kinds, offsets, and rendered text seen by embedding applications.
//! Invariants: Every failure surfaces as one `Error` with a stable `ErrorKind`.
//! Invariants: Tests avoid payload leakage; assertions target kinds, offsets, and labels.

use std::error::Error as _;

use portable_json::api::{
    Bindings, EngineConfig, EngineKind, ErrorKind, JsonKind, JsonParser, JsonValue, NativeEngine,
    ParseOptions, Registry, SerializeOptions, to_exit_code,
};

fn native() -> NativeEngine {
    NativeEngine::new(ParseOptions::default(), SerializeOptions::default())
}

#[test]
fn syntax_error_display_names_offset_and_expectation() {
    let err = native().parse(r#"{"a":}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.offset(), Some(5));
    assert_eq!(err.expected(), Some("value"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("Syntax: "), "{rendered}");
    assert!(rendered.contains("(expected: value)"), "{rendered}");
    assert!(rendered.contains("(offset: 5)"), "{rendered}");
}

#[test]
fn depth_error_reports_limit() {
    let parser = NativeEngine::new(
        ParseOptions::default().max_depth(1),
        SerializeOptions::default(),
    );
    let err = parser.parse("[[]]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    assert_eq!(err.limit(), Some(1));
    assert!(err.to_string().contains("(limit: 1)"));
}

#[test]
fn encoding_error_keeps_utf8_source() {
    let err = native().parse_slice(&[b'"', 0xc3, b'"']).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert_eq!(err.offset(), Some(1));
    assert!(err.source().is_some());
}

#[test]
fn serde_engine_errors_drop_line_column_suffix() {
    let config = EngineConfig {
        engine: EngineKind::SerdeJson,
        ..EngineConfig::default()
    };
    let err = Bindings::from_config(&config)
        .parse("{\n  \"a\": x\n}")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.offset(), Some(9));
    assert_eq!(err.expected(), Some("value"));
    let message = err.message().expect("message");
    assert!(!message.contains(" at line "), "{message}");
    assert!(err.source().is_some());
}

#[test]
fn access_errors_explain_mismatch() {
    let value = native().parse(r#"{"items":[1,2]}"#).expect("parse");
    let items = value.field("items").expect("items");
    assert_eq!(items.kind(), JsonKind::Array);
    assert_eq!(items.element(1).expect("element"), &JsonValue::from(2));

    let missing = value.field("nope").unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::Access);

    let out_of_bounds = items.element(5).unwrap_err();
    assert_eq!(out_of_bounds.kind(), ErrorKind::Access);

    let mismatch = items.field("x").unwrap_err();
    assert_eq!(mismatch.kind(), ErrorKind::Access);
    assert_eq!(mismatch.expected(), Some("object"));
}

#[test]
fn non_finite_error_carries_location_and_hint() {
    let config = EngineConfig::default();
    let value: JsonValue = [("score", JsonValue::from(f64::NEG_INFINITY))]
        .into_iter()
        .collect();
    let err = Bindings::from_config(&config).serialize(&value).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidNumericValue);
    assert_eq!(err.location(), Some("$.score"));
    assert!(err.hint().is_some());
    assert!(err.to_string().contains("-Infinity"));
}

#[test]
fn registry_misuse_is_usage_error() {
    let registry = Registry::new();
    assert_eq!(registry.installed().unwrap_err().kind(), ErrorKind::Usage);
    registry
        .install(Bindings::from_config(&EngineConfig::default()))
        .expect("install");
    let again = registry
        .install(Bindings::from_config(&EngineConfig::default()))
        .unwrap_err();
    assert_eq!(again.kind(), ErrorKind::Usage);
    assert_eq!(to_exit_code(again.kind()), 2);
}

#[test]
fn exit_codes_distinguish_parse_failures() {
    let kinds = [
        ErrorKind::Syntax,
        ErrorKind::Encoding,
        ErrorKind::DepthExceeded,
        ErrorKind::TrailingData,
        ErrorKind::InvalidNumericValue,
    ];
    let mut codes: Vec<i32> = kinds.iter().map(|kind| to_exit_code(*kind)).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), kinds.len());
    assert!(codes.iter().all(|code| *code > 2));
}
