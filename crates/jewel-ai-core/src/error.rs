//! Error types for the structured output pipeline
//!
//! Errors are split by who is allowed to see them:
//! - [`TransportError`] and [`PipelineError`] reach the caller as `Err`.
//! - [`ExtractionError`] and [`ValidationError`] never do; the pipeline
//!   absorbs them into a fallback record.

use thiserror::Error;

use crate::language::{Language, Message};
use crate::validate::Violation;

/// Failure talking to the generation service
#[derive(Error, Debug)]
pub enum TransportError {
    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request did not complete in time
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The service answered with a non-success status
    #[error("Service returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The service answered but the body could not be read
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The client could not be constructed
    #[error("Client configuration error: {0}")]
    Config(String),
}

impl TransportError {
    /// Whether retrying the same request cannot succeed
    pub fn is_permanent(&self) -> bool {
        match self {
            TransportError::Status { status, .. } => (400..500).contains(status) && *status != 429,
            TransportError::Config(_) | TransportError::InvalidResponse(_) => true,
            TransportError::Connection(_) | TransportError::Timeout(_) => false,
        }
    }
}

/// Why no JSON value could be pulled out of a raw response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionFailure {
    /// No `{` or no `}` in the text
    NoJsonSpan,
    /// A brace span was found but is not valid JSON
    Unparsable(String),
}

impl std::fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionFailure::NoJsonSpan => write!(f, "no JSON object found"),
            ExtractionFailure::Unparsable(msg) => write!(f, "JSON parse error: {}", msg),
        }
    }
}

/// The raw response did not contain a parsable JSON object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Extraction failed: {reason}")]
pub struct ExtractionError {
    /// The untouched response text
    pub raw: String,
    /// What went wrong
    pub reason: ExtractionFailure,
}

impl ExtractionError {
    /// No brace span present
    pub fn no_json_span(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            reason: ExtractionFailure::NoJsonSpan,
        }
    }

    /// A span was found but failed to parse
    pub fn unparsable(raw: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            reason: ExtractionFailure::Unparsable(message.into()),
        }
    }
}

/// The parsed value does not conform to the contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Response does not match contract: {} violation(s)", .violations.len())]
pub struct ValidationError {
    /// Every violation found, in contract order
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Create a validation error from a list of violations
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

/// A contract declaration that breaks the contract invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// `build` was called without naming a primary narrative field
    #[error("Contract '{0}' has no primary narrative field")]
    MissingPrimary(String),

    /// The named primary field is not declared
    #[error("Contract '{contract}' names unknown primary field '{field}'")]
    UnknownPrimary {
        /// Contract name
        contract: String,
        /// Field name
        field: String,
    },

    /// The primary field is not a required string
    #[error("Primary field '{field}' of contract '{contract}' must be a required string")]
    PrimaryNotString {
        /// Contract name
        contract: String,
        /// Field name
        field: String,
    },

    /// Two fields share a name within one object
    #[error("Contract '{contract}' declares field '{path}' twice")]
    DuplicateField {
        /// Contract name
        contract: String,
        /// Path of the duplicated field
        path: String,
    },

    /// An enum field has no allowed values, so no value can satisfy it
    #[error("Contract '{contract}' declares enum field '{path}' with no values")]
    EmptyEnum {
        /// Contract name
        contract: String,
        /// Path of the enum field
        path: String,
    },
}

/// Errors returned to callers of the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The generation service could not be reached or refused the request
    #[error("{}", .language.text(Message::TransportFailure))]
    Transport {
        /// Language the caller asked for
        language: Language,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },

    /// The task input could not be serialized into prompt context
    #[error("Invalid task input: {0}")]
    InvalidInput(String),

    /// A task's contract declaration is inconsistent
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// A task's output type cannot hold values its contract accepts
    #[error("Contract mismatch: {0}")]
    ContractMismatch(String),

    /// Generation settings are outside their allowed ranges
    #[error("Invalid generation settings: {0}")]
    Settings(#[from] ConfigError),
}

impl PipelineError {
    /// Human readable message in the caller's language
    pub fn localized_message(&self) -> String {
        match self {
            PipelineError::Transport { language, .. } => {
                language.text(Message::TransportFailure).to_string()
            }
            other => other.to_string(),
        }
    }

    /// Whether the failure came from the generation service
    pub fn is_transport(&self) -> bool {
        matches!(self, PipelineError::Transport { .. })
    }
}

/// Errors loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value is outside its allowed range
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key
        key: String,
        /// What is wrong with it
        message: String,
    },

    /// File access or I/O error
    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
