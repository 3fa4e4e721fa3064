//! Error types for apiref.
//!
//! Library crates use [`ApiRefError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all apiref operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiRefError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An input JSON file could not be parsed.
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A description field holds list markup that cannot be converted.
    #[error("malformed markup in {field}: {source}")]
    MalformedMarkup { field: String, source: MarkupError },

    /// Data validation error (unexpected shape, missing key, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Output serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Structural problems found while converting list markup.
///
/// Offsets are byte positions in the description as authored, anchors included.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    /// A `<ul>` block with no `<li>` items in it.
    #[error("list at byte {offset} has no items")]
    EmptyList { offset: usize },

    /// A `<ul>` that is never closed.
    #[error("list opened at byte {offset} is never closed")]
    UnclosedList { offset: usize },

    /// A `<li>` that is never closed.
    #[error("list item opened at byte {offset} is never closed")]
    UnclosedItem { offset: usize },
}

impl MarkupError {
    /// Byte offset of the offending tag.
    pub fn offset(&self) -> usize {
        match self {
            Self::EmptyList { offset }
            | Self::UnclosedList { offset }
            | Self::UnclosedItem { offset } => *offset,
        }
    }

    /// The same error with its offset rewritten by `f`.
    pub fn map_offset(self, f: impl FnOnce(usize) -> usize) -> Self {
        match self {
            Self::EmptyList { offset } => Self::EmptyList { offset: f(offset) },
            Self::UnclosedList { offset } => Self::UnclosedList { offset: f(offset) },
            Self::UnclosedItem { offset } => Self::UnclosedItem { offset: f(offset) },
        }
    }
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ApiRefError>;

impl ApiRefError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error for the given input file.
    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Attach a field locator to a markup error.
    pub fn markup(field: impl Into<String>, source: MarkupError) -> Self {
        Self::MalformedMarkup {
            field: field.into(),
            source,
        }
    }
}
