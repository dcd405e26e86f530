//! Error types for ragdesk.
//!
//! Library crates use [`RagdeskError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all ragdesk operations.
#[derive(Debug, thiserror::Error)]
pub enum RagdeskError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to the service.
    #[error("network error: {0}")]
    Network(String),

    /// The service returned a body that could not be decoded as JSON.
    #[error("decode error: {0}")]
    Decode(String),

    /// Data validation error (bad URL, invalid parameter, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RagdeskError>;

impl RagdeskError {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = RagdeskError::config("missing base_url");
        assert_eq!(err.to_string(), "config error: missing base_url");

        let err = RagdeskError::Network("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
    }
}
