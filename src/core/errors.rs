//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for usetesting operations
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A flag name that no rule or option recognizes
    #[error("unknown flag `{name}`")]
    UnknownFlag { name: String },

    /// A flag given a value that is not a boolean
    #[error("invalid value `{value}` for flag `{name}`: expected true or false")]
    InvalidFlagValue { name: String, value: String },

    /// Parsing errors
    #[error("Parse error in {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },

    /// File system related errors
    #[error("File system error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a parse error for a file
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with path context
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Whether this error stems from user configuration rather than the environment.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::UnknownFlag { .. } | Self::InvalidFlagValue { .. } | Self::Toml(_)
        )
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_error_messages() {
        let err = Error::UnknownFlag {
            name: "osfoo".into(),
        };
        assert_eq!(err.to_string(), "unknown flag `osfoo`");

        let err = Error::InvalidFlagValue {
            name: "oschdir".into(),
            value: "maybe".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value `maybe` for flag `oschdir`: expected true or false"
        );
        assert!(err.is_config_error());
    }

    #[test]
    fn test_io_errors_are_not_config_errors() {
        let err = Error::file_system(
            "/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(!err.is_config_error());
        assert!(err.to_string().contains("/missing"));
    }
}
