//! Purpose: Host-facing engine configuration.
//! Exports: `EngineConfig`, `EngineKind`.
//! Role: One serde-deserializable record the composition layer turns into `Bindings`.
//! Invariants: Missing fields take documented defaults; unknown fields are usage errors.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind};
use crate::core::number::NonFinitePolicy;
use crate::core::parse::{DEFAULT_MAX_DEPTH, ParseOptions};
use crate::core::serialize::SerializeOptions;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    #[default]
    Native,
    SerdeJson,
}

impl EngineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Native => "native",
            EngineKind::SerdeJson => "serde-json",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub engine: EngineKind,
    pub max_depth: usize,
    pub pretty: bool,
    pub non_finite: NonFinitePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Native,
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
            non_finite: NonFinitePolicy::Reject,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("invalid engine config: {err}"))
                .with_hint(
                    "Expected an object with optional keys engine, max_depth, pretty, non_finite.",
                )
                .with_source(err)
        })
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::default().max_depth(self.max_depth)
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions::default()
            .pretty(self.pretty)
            .non_finite(self.non_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineConfig, EngineKind};
    use crate::core::error::ErrorKind;
    use crate::core::number::NonFinitePolicy;

    #[test]
    fn empty_object_yields_defaults() {
        let config = EngineConfig::from_json("{}").expect("config");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.parse_options().max_depth, 1000);
        assert!(!config.serialize_options().pretty);
    }

    #[test]
    fn fields_are_read() {
        let config = EngineConfig::from_json(
            r#"{"engine":"serde-json","max_depth":16,"pretty":true,"non_finite":"null"}"#,
        )
        .expect("config");
        assert_eq!(config.engine, EngineKind::SerdeJson);
        assert_eq!(config.max_depth, 16);
        assert!(config.pretty);
        assert_eq!(config.non_finite, NonFinitePolicy::Null);
    }

    #[test]
    fn unknown_fields_are_usage_errors() {
        let err = EngineConfig::from_json(r#"{"maxDepth":3}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.hint().is_some());
    }
}
