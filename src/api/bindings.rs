//! Purpose: Bind exactly one parser/serializer pair for the process.
//! Exports: `Bindings`, `Registry`, `install`, `installed`.
//! Role: Composition seam; the host picks an engine at startup, core code only asks for "the" pair.
//! Invariants: A registry accepts one installation; later attempts are usage errors.
//! Invariants: Callers never inspect which engine is behind the pair.
use std::sync::{Arc, OnceLock};

use crate::api::config::{EngineConfig, EngineKind};
use crate::api::engine::{JsonParser, JsonSerializer, NativeEngine, SerdeEngine};
use crate::core::error::{Error, ErrorKind};
use crate::core::value::JsonValue;

#[derive(Clone, Debug)]
pub struct Bindings {
    parser: Arc<dyn JsonParser>,
    serializer: Arc<dyn JsonSerializer>,
}

impl Bindings {
    pub fn new(parser: Arc<dyn JsonParser>, serializer: Arc<dyn JsonSerializer>) -> Self {
        Self { parser, serializer }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let parse = config.parse_options();
        let serialize = config.serialize_options();
        tracing::debug!(
            engine = %config.engine,
            max_depth = config.max_depth,
            pretty = config.pretty,
            non_finite = ?config.non_finite,
            "building json bindings"
        );
        match config.engine {
            EngineKind::Native => {
                let engine = Arc::new(NativeEngine::new(parse, serialize));
                Self::new(engine.clone(), engine)
            }
            EngineKind::SerdeJson => {
                let engine = Arc::new(SerdeEngine::new(parse, serialize));
                Self::new(engine.clone(), engine)
            }
        }
    }

    pub fn parser(&self) -> &dyn JsonParser {
        self.parser.as_ref()
    }

    pub fn serializer(&self) -> &dyn JsonSerializer {
        self.serializer.as_ref()
    }

    pub fn parse(&self, text: &str) -> Result<JsonValue, Error> {
        self.parser.parse(text)
    }

    pub fn parse_slice(&self, bytes: &[u8]) -> Result<JsonValue, Error> {
        self.parser.parse_slice(bytes)
    }

    pub fn serialize(&self, value: &JsonValue) -> Result<String, Error> {
        self.serializer.serialize(value)
    }
}

/// Write-once slot holding the active bindings.
#[derive(Debug, Default)]
pub struct Registry {
    slot: OnceLock<Bindings>,
}

impl Registry {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    pub fn install(&self, bindings: Bindings) -> Result<&Bindings, Error> {
        let mut fresh = false;
        let active = self.slot.get_or_init(|| {
            fresh = true;
            bindings
        });
        if !fresh {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("json bindings are already installed")
                .with_hint("Install bindings once, during startup."));
        }
        tracing::debug!(bindings = ?active, "json bindings installed");
        Ok(active)
    }

    pub fn installed(&self) -> Result<&Bindings, Error> {
        self.slot.get().ok_or_else(|| {
            Error::new(ErrorKind::Usage)
                .with_message("no json bindings installed")
                .with_hint("Call `install` with the host's chosen engine before parsing.")
        })
    }
}

static GLOBAL: Registry = Registry::new();

/// Installs the process-wide pair.
pub fn install(bindings: Bindings) -> Result<&'static Bindings, Error> {
    GLOBAL.install(bindings)
}

/// Returns the process-wide pair installed at startup.
pub fn installed() -> Result<&'static Bindings, Error> {
    GLOBAL.installed()
}
