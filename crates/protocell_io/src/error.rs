//! Error types for protocell_io crate.
//!
//! Covers the snapshot store: file system access, field stream parsing,
//! genome validation and the JSON save summary.

use thiserror::Error;

/// Main error type for protocell_io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// A malformed or out-of-range value inside a field stream
    #[error("{stream}:{line}: {message}")]
    Parse {
        stream: String,
        line: usize,
        message: String,
    },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

/// Result type alias for protocell_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    /// Creates a new serialization error.
    #[must_use]
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a parse error pointing at `line` (1-based) of `stream`.
    #[must_use]
    pub fn parse<S: Into<String>, M: Into<String>>(stream: S, line: usize, message: M) -> Self {
        Self::Parse {
            stream: stream.into(),
            line,
            message: message.into(),
        }
    }

    /// Creates a new validation error.
    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a new not found error.
    #[must_use]
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound(resource.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stream and line of a parse error, looking through context wrappers.
    #[must_use]
    pub fn location(&self) -> Option<(&str, usize)> {
        match self {
            Self::Parse { stream, line, .. } => Some((stream.as_str(), *line)),
            Self::Context { source, .. } => source.location(),
            _ => None,
        }
    }
}
