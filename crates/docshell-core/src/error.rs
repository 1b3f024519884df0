//! Error types for docshell.
//!
//! Startup errors (`Config`, `Connect`) are fatal and end the process with a
//! non-zero exit code. Everything else is scoped to the command that raised it.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed driver or backend error kept as the `source` of a `ShellError`.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for docshell.
#[derive(Debug, Error)]
pub enum ShellError {
    // Startup errors
    #[error("Configuration error at {}: {}", .path.display(), .message)]
    Config {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Connection error: {message}")]
    Connect {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    // Per-command errors
    #[error("JSON parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Operation failed: {message}")]
    Operation {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    // Console errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Result type alias for docshell operations.
pub type Result<T> = std::result::Result<T, ShellError>;

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(err: serde_json::Error) -> Self {
        ShellError::Parse {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for ShellError {
    fn from(err: mongodb::error::Error) -> Self {
        ShellError::Operation {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl ShellError {
    /// Create a configuration error tied to a config file.
    pub fn config(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ShellError::Config {
            message: message.into(),
            path: path.into(),
            source: None,
        }
    }

    /// Create an operation error without an underlying cause.
    pub fn operation(message: impl Into<String>) -> Self {
        ShellError::Operation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a parse error without an underlying cause.
    pub fn parse(message: impl Into<String>) -> Self {
        ShellError::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error must terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Config { .. } | ShellError::Connect { .. })
    }

    /// Process exit code for this error. Zero is reserved for a normal quit.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShellError::config("missing required key 'dbname'", "config.properties");
        assert_eq!(
            err.to_string(),
            "Configuration error at config.properties: missing required key 'dbname'"
        );
        assert_eq!(
            ShellError::operation("connection is closed").to_string(),
            "Operation failed: connection is closed"
        );
    }

    #[test]
    fn test_fatal_errors() {
        assert!(ShellError::config("unreadable", "x.properties").is_fatal());
        let connect = ShellError::Connect {
            message: "no scheme".into(),
            source: None,
        };
        assert!(connect.is_fatal());
        assert!(!ShellError::parse("expected a JSON object").is_fatal());
        assert!(!ShellError::operation("server error").is_fatal());
    }

    #[test]
    fn test_json_error_becomes_parse_error() {
        let err: ShellError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, ShellError::Parse { source: Some(_), .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
