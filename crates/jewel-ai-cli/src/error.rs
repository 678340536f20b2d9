//! Error types for the Jewel AI CLI

use jewel_ai_core::{ConfigError, PipelineError};
use thiserror::Error;

/// CLI errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Input file parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration loading error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline invocation error
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Output serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CliError::InvalidInput(msg.into())
    }

    /// Create a file error
    pub fn file_error(msg: impl Into<String>) -> Self {
        CliError::FileError(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        CliError::ParseError(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        match self {
            CliError::InvalidInput(_)
            | CliError::FileError(_)
            | CliError::ParseError(_)
            | CliError::Config(_) => true,
            CliError::Pipeline(PipelineError::InvalidInput(_) | PipelineError::Settings(_)) => true,
            _ => false,
        }
    }

    /// Whether the generation service failed
    pub fn is_transport(&self) -> bool {
        matches!(self, CliError::Pipeline(e) if e.is_transport())
    }

    /// Whether a file could not be read
    pub fn is_file_error(&self) -> bool {
        matches!(
            self,
            CliError::FileError(_) | CliError::Config(ConfigError::File(_))
        )
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::SerializationError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::SerializationError(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jewel_ai_core::{Language, TransportError};

    #[test]
    fn test_error_display() {
        let err = CliError::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "Invalid input: test error");
    }

    #[test]
    fn test_is_user_error() {
        assert!(CliError::invalid_input("test").is_user_error());
        assert!(CliError::file_error("test").is_user_error());
        assert!(CliError::parse_error("test").is_user_error());
        assert!(!CliError::InternalError("test".to_string()).is_user_error());
    }

    #[test]
    fn test_transport_classification() {
        let err = CliError::from(PipelineError::Transport {
            language: Language::En,
            source: TransportError::Timeout("slow".to_string()),
        });
        assert!(err.is_transport());
        assert!(!err.is_user_error());
        assert_eq!(err.to_string(), Language::En.text(jewel_ai_core::Message::TransportFailure));
    }

    #[test]
    fn test_file_classification() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(CliError::from(ConfigError::from(io)).is_file_error());
        assert!(CliError::file_error("x").is_file_error());
        assert!(!CliError::parse_error("x").is_file_error());
    }
}
