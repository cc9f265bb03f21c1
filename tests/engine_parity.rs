//! Purpose: Lock engine contract expectations with corpus + differential coverage.
//! Exports: Integration tests only (no runtime exports).
//! Role: Catch semantic drift between the native engine and the serde_json engine.
//! Invariants: Both engines yield equal values, identical text, and identical error kinds.
//! Invariants: Documented lossy cases (large integers, overflow) stay pinned.
//! Notes: Error offsets are compared only where both engines report the failing byte itself.

use portable_json::api::{
    Bindings, EngineConfig, EngineKind, ErrorKind, JsonValue, NonFinitePolicy,
};
use serde_json::json;

fn bindings(engine: EngineKind, config: EngineConfig) -> Bindings {
    Bindings::from_config(&EngineConfig { engine, ..config })
}

fn both(config: EngineConfig) -> [Bindings; 2] {
    [
        bindings(EngineKind::Native, config),
        bindings(EngineKind::SerdeJson, config),
    ]
}

fn assert_differential_parity(input: &str) {
    let [native, serde] = both(EngineConfig::default());
    match (native.parse(input), serde.parse(input)) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a, b, "engine value mismatch for {input:?}");
            let text_a = native.serialize(&a).expect("native serialize");
            let text_b = serde.serialize(&b).expect("serde serialize");
            assert_eq!(text_a, text_b, "engine text mismatch for {input:?}");
        }
        (Err(a), Err(b)) => assert_eq!(a.kind(), b.kind(), "error kind mismatch for {input:?}"),
        (left, right) => {
            panic!("engine outcome mismatch for {input:?}: native={left:?}, serde={right:?}")
        }
    }
}

fn nested(depth: usize) -> String {
    format!("{}0{}", "[".repeat(depth), "]".repeat(depth))
}

#[test]
fn corpus_valid_payloads_match() {
    let corpus = [
        r#"{"a":1,"b":"ok"}"#,
        r#"[1,2,3,{"x":true}]"#,
        r#"{"nested":{"arr":[{"k":"v"}]}}"#,
        r#"{"unicode":"☃","raw":"snow ☃","pair":"😀"}"#,
        r#"{"esc":"\"\\\/\b\f\n\r\t\u0001\u001f\u007f"}"#,
        r#"[0,-0,0.1,-12.5e1,1E2,1e21,1e-7,123456789012345678,5e-324]"#,
        r#"[1e-400,-1e-400]"#,
        " \t\r\n[ ] ",
        "{}",
        r#""""#,
        "null",
        "true",
        "false",
        r#"{"z":1,"y":{"x":[null,false]},"":""}"#,
    ];

    for case in corpus {
        assert_differential_parity(case);
    }
}

#[test]
fn corpus_invalid_payloads_match_kinds() {
    let corpus = [
        ("", ErrorKind::Syntax),
        ("   ", ErrorKind::Syntax),
        ("[1,]", ErrorKind::Syntax),
        (r#"{"a":1,}"#, ErrorKind::Syntax),
        ("{,}", ErrorKind::Syntax),
        ("[1 2]", ErrorKind::Syntax),
        (r#"{"a" 1}"#, ErrorKind::Syntax),
        ("{1:2}", ErrorKind::Syntax),
        ("tru", ErrorKind::Syntax),
        ("NaN", ErrorKind::Syntax),
        ("01", ErrorKind::Syntax),
        ("-", ErrorKind::Syntax),
        ("1.", ErrorKind::Syntax),
        (".5", ErrorKind::Syntax),
        ("+1", ErrorKind::Syntax),
        ("1e", ErrorKind::Syntax),
        ("'x'", ErrorKind::Syntax),
        ("\"tab\there\"", ErrorKind::Syntax),
        (r#""\x""#, ErrorKind::Syntax),
        (r#""\u12g4""#, ErrorKind::Syntax),
        (r#""\ud800""#, ErrorKind::Syntax),
        (r#""unterminated"#, ErrorKind::Syntax),
        ("\u{feff}{}", ErrorKind::Syntax),
        ("// c\n1", ErrorKind::Syntax),
        ("123 456", ErrorKind::TrailingData),
        ("{} {}", ErrorKind::TrailingData),
        ("nullx", ErrorKind::TrailingData),
        ("[1]]", ErrorKind::TrailingData),
    ];

    let [native, serde] = both(EngineConfig::default());
    for (input, kind) in corpus {
        let left = native.parse(input).expect_err("native should reject");
        let right = serde.parse(input).expect_err("serde should reject");
        assert_eq!(left.kind(), kind, "native kind for {input:?}");
        assert_eq!(right.kind(), kind, "serde kind for {input:?}");
        for err in [&left, &right] {
            assert!(err.offset().is_some(), "offset for {input:?}: {err}");
            assert!(err.expected().is_some(), "expected context for {input:?}: {err}");
        }
    }
}

#[test]
fn missing_separator_names_the_same_expectation() {
    for engine in both(EngineConfig::default()) {
        let err = engine.parse("[1 2]").expect_err("missing comma");
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.offset(), Some(3));
        assert_eq!(err.expected(), Some("',' or ']'"));

        let err = engine.parse(r#"{"a" 1}"#).expect_err("missing colon");
        assert_eq!(err.offset(), Some(5));
        assert_eq!(err.expected(), Some("':'"));
    }
}

#[test]
fn corpus_malformed_utf8_rejected() {
    let bad_utf8 = [b'[', b'"', 0xff, 0xfe, b'"', b']'];
    for engine in both(EngineConfig::default()) {
        let err = engine.parse_slice(&bad_utf8).expect_err("malformed utf8");
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert_eq!(err.offset(), Some(2));
    }
}

#[test]
fn trailing_data_offsets_match() {
    for engine in both(EngineConfig::default()) {
        let err = engine.parse("123 456").expect_err("trailing");
        assert_eq!(err.kind(), ErrorKind::TrailingData);
        assert_eq!(err.offset(), Some(4));
        assert_eq!(err.expected(), Some("end of input"));
    }
}

#[test]
fn deep_nesting_is_bounded_identically() {
    let unclosed = "[".repeat(2000);
    let balanced = format!("{}{}", "[".repeat(2000), "]".repeat(2000));
    for engine in both(EngineConfig::default()) {
        for input in [&unclosed, &balanced] {
            let err = engine.parse(input).expect_err("depth");
            assert_eq!(err.kind(), ErrorKind::DepthExceeded);
            assert_eq!(err.offset(), Some(1000));
            assert_eq!(err.limit(), Some(1000));
        }
    }

    let config = EngineConfig {
        max_depth: 2,
        ..EngineConfig::default()
    };
    for engine in both(config) {
        assert!(engine.parse("[[0]]").is_ok());
        let err = engine.parse(r#"[{"a":[]}]"#).expect_err("depth");
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
        assert_eq!(err.offset(), Some(6));
        assert!(engine.parse(r#"["[[[[[["]"#).is_ok());
    }
}

#[test]
fn full_default_depth_round_trips_on_the_test_thread() {
    let arrays = nested(1000);
    let objects = format!("{}0{}", r#"{"k":"#.repeat(1000), "}".repeat(1000));
    let [native, serde] = both(EngineConfig::default());
    for input in [&arrays, &objects] {
        let from_native = native.parse(input).expect("native parse");
        let from_serde = serde.parse(input).expect("serde parse");
        assert_eq!(from_native.depth(), 1000);
        assert_eq!(from_serde.depth(), 1000);
        let text = native.serialize(&from_native).expect("native serialize");
        assert_eq!(&text, input);
        assert_eq!(serde.serialize(&from_serde).expect("serde serialize"), text);
    }
}

#[test]
fn duplicate_keys_keep_first_position_and_last_value() {
    for engine in both(EngineConfig::default()) {
        let value = engine.parse(r#"{"a":1,"b":0,"a":2}"#).expect("parse");
        let map = value.as_object().expect("object");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&JsonValue::from(2)));
        assert_eq!(engine.serialize(&value).expect("serialize"), r#"{"a":2,"b":0}"#);
    }
}

#[test]
fn key_order_is_preserved() {
    for engine in both(EngineConfig::default()) {
        let value = engine.parse(r#"{"b":1,"a":2}"#).expect("parse");
        assert_eq!(engine.serialize(&value).expect("serialize"), r#"{"b":1,"a":2}"#);
    }
}

#[test]
fn structural_equality_ignores_key_order() {
    for engine in both(EngineConfig::default()) {
        let left = engine.parse(r#"{"a":1,"b":2}"#).expect("left");
        let right = engine.parse(r#"{"b":2,"a":1}"#).expect("right");
        assert_eq!(left, right);
        let arrays = engine.parse("[1,2]").expect("arrays");
        assert_ne!(arrays, engine.parse("[2,1]").expect("reversed"));
    }
}

#[test]
fn large_integers_lose_precision_identically() {
    for engine in both(EngineConfig::default()) {
        let value = engine.parse("9007199254740993").expect("parse");
        assert_eq!(engine.serialize(&value).expect("serialize"), "9007199254740992");
        let value = engine.parse("12345678901234567890").expect("parse");
        assert_eq!(engine.serialize(&value).expect("serialize"), "12345678901234567000");
    }
}

#[test]
fn round_trip_and_determinism() {
    let value = JsonValue::from(json!({
        "name": "portable",
        "tags": ["a", "b\n", "\u{1}", "é"],
        "nums": [0, 1.5, -2, 1e-7, 1e21, 3.0e100],
        "nested": { "empty_a": [], "empty_o": {}, "n": null, "t": true }
    }));
    for pretty in [false, true] {
        let config = EngineConfig {
            pretty,
            ..EngineConfig::default()
        };
        let [native, serde] = both(config);
        let first = native.serialize(&value).expect("serialize");
        assert_eq!(first, native.serialize(&value).expect("again"));
        assert_eq!(first, serde.serialize(&value).expect("serde"));
        assert_eq!(native.parse(&first).expect("native parse"), value);
        assert_eq!(serde.parse(&first).expect("serde parse"), value);
    }
}

#[test]
fn pretty_layout_matches() {
    let config = EngineConfig {
        pretty: true,
        ..EngineConfig::default()
    };
    let expected = "{\n  \"a\": [\n    1,\n    {}\n  ],\n  \"b\": []\n}";
    for engine in both(config) {
        let value = engine.parse(r#"{"a":[1,{}],"b":[]}"#).expect("parse");
        assert_eq!(engine.serialize(&value).expect("serialize"), expected);
    }
}

#[test]
fn non_finite_policy_applies_to_both_engines() {
    let mut value = JsonValue::from(json!({ "items": [1, 2] }));
    if let Some(items) = value
        .as_object_mut()
        .and_then(|map| map.get_mut("items"))
        .and_then(JsonValue::as_array_mut)
    {
        items[1] = JsonValue::from(f64::NAN);
    }

    for engine in both(EngineConfig::default()) {
        let err = engine.serialize(&value).expect_err("reject");
        assert_eq!(err.kind(), ErrorKind::InvalidNumericValue);
        assert_eq!(err.location(), Some("$.items[1]"));
    }

    let config = EngineConfig {
        non_finite: NonFinitePolicy::Null,
        ..EngineConfig::default()
    };
    for engine in both(config) {
        assert_eq!(
            engine.serialize(&value).expect("null policy"),
            r#"{"items":[1,null]}"#
        );
    }
}

#[test]
fn overflowing_literals_parse_to_infinity_and_reject_on_write() {
    for engine in both(EngineConfig::default()) {
        let value = engine.parse("[1e400]").expect("parse");
        assert_eq!(
            value.get_index(0).and_then(JsonValue::as_f64),
            Some(f64::INFINITY)
        );
        let err = engine.serialize(&value).expect_err("reject");
        assert_eq!(err.kind(), ErrorKind::InvalidNumericValue);
        assert_eq!(err.location(), Some("$[0]"));
    }
}
