//! Purpose: Single error type shared by parsers, serializers, the registry, and the CLI.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`.
//! Role: Typed failure returned to the immediate caller; never a partial value.
//! Invariants: Every failure carries a kind; context fields are optional and additive.
//! Invariants: Exit code mapping is stable once published.
use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    Io,
    Syntax,
    Encoding,
    DepthExceeded,
    TrailingData,
    InvalidNumericValue,
    Access,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Internal => "internal",
            ErrorKind::Usage => "usage",
            ErrorKind::Io => "io",
            ErrorKind::Syntax => "syntax",
            ErrorKind::Encoding => "encoding",
            ErrorKind::DepthExceeded => "depth-exceeded",
            ErrorKind::TrailingData => "trailing-data",
            ErrorKind::InvalidNumericValue => "invalid-numeric-value",
            ErrorKind::Access => "access",
        }
    }
}

/// Boxed so `Result<T, Error>` stays pointer-sized on deep call paths.
#[derive(Debug)]
pub struct Error {
    inner: Box<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    expected: Option<String>,
    location: Option<String>,
    path: Option<PathBuf>,
    offset: Option<usize>,
    limit: Option<usize>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            inner: Box::new(ErrorInner {
                kind,
                message: None,
                hint: None,
                expected: None,
                location: None,
                path: None,
                offset: None,
                limit: None,
                source: None,
            }),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.inner.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.inner.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.inner.hint.as_deref()
    }

    /// Token or construct the parser was looking for when it failed.
    pub fn expected(&self) -> Option<&str> {
        self.inner.expected.as_deref()
    }

    /// Location inside a value tree, e.g. `$.items[2]`.
    pub fn location(&self) -> Option<&str> {
        self.inner.location.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Byte offset into the input text.
    pub fn offset(&self) -> Option<usize> {
        self.inner.offset
    }

    /// Configured nesting limit for `DepthExceeded`.
    pub fn limit(&self) -> Option<usize> {
        self.inner.limit
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.inner.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.inner.hint = Some(hint.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.inner.expected = Some(expected.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.inner.location = Some(location.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner.path = Some(path.into());
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.inner.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.inner.limit = Some(limit);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.inner.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.inner.kind)?;
        if let Some(message) = &self.inner.message {
            write!(f, ": {message}")?;
        }
        if let Some(expected) = &self.inner.expected {
            write!(f, " (expected: {expected})")?;
        }
        if let Some(offset) = self.inner.offset {
            write!(f, " (offset: {offset})")?;
        }
        if let Some(limit) = self.inner.limit {
            write!(f, " (limit: {limit})")?;
        }
        if let Some(location) = &self.inner.location {
            write!(f, " (at: {location})")?;
        }
        if let Some(path) = &self.inner.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::Io => 3,
        ErrorKind::Syntax => 4,
        ErrorKind::Encoding => 5,
        ErrorKind::DepthExceeded => 6,
        ErrorKind::TrailingData => 7,
        ErrorKind::InvalidNumericValue => 8,
        ErrorKind::Access => 9,
    }
}
