//! Error types for the daily-paper pipeline.
//!
//! Library crates use [`DailyPaperError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all pipeline operations.
///
/// Per-item curation rejection is deliberately *not* represented here:
/// the curator returns `None` and the item is dropped. Every variant
/// below is fatal and aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum DailyPaperError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// External tool invocation failure (spawn error, timeout, or
    /// nonzero exit with no usable output).
    #[error("{tool} invocation failed: {message}")]
    Invocation { tool: String, message: String },

    /// Malformed external tool output (wrong shape, missing fields).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON (de)serialization error.
    #[error("json error: {message}")]
    Json { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DailyPaperError>;

impl DailyPaperError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an invocation error, naming the tool that failed.
    pub fn invocation(tool: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Invocation {
            tool: tool.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a JSON error from any displayable message.
    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json {
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
}
