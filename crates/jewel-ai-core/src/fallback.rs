//! Fallback records for replies that cannot be used
//!
//! A fallback is the contract's empty default with the primary narrative
//! field replaced by a localized diagnostic. It is returned as an ordinary
//! value so the caller always has something to render.

use serde_json::Value;

use crate::contract::Contract;
use crate::error::{ExtractionError, ValidationError};
use crate::language::{Language, Message};
use crate::normalize::NormalizedRecord;
use crate::validate::Violation;

/// Why a fallback was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackCause {
    /// No JSON object could be parsed from the reply
    Extraction(ExtractionError),
    /// The parsed object did not match the contract
    Validation(ValidationError),
}

impl FallbackCause {
    /// Short label used in logs, metrics and CLI output
    pub const fn kind(&self) -> &'static str {
        match self {
            FallbackCause::Extraction(_) => "extraction",
            FallbackCause::Validation(_) => "validation",
        }
    }
}

impl std::fmt::Display for FallbackCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackCause::Extraction(e) => write!(f, "{}", e),
            FallbackCause::Validation(e) => write!(f, "{}", e),
        }
    }
}

impl From<ExtractionError> for FallbackCause {
    fn from(err: ExtractionError) -> Self {
        FallbackCause::Extraction(err)
    }
}

impl From<ValidationError> for FallbackCause {
    fn from(err: ValidationError) -> Self {
        FallbackCause::Validation(err)
    }
}

/// Render the diagnostic text for a failure
///
/// Extraction diagnostics end with the raw reply, untouched.
pub fn diagnostic(language: Language, cause: &FallbackCause) -> String {
    match cause {
        FallbackCause::Extraction(err) => format!(
            "{}\n\n{}\n{}",
            language.text(Message::UnparsableResponse),
            language.text(Message::RawResponseHeading),
            err.raw
        ),
        FallbackCause::Validation(err) => {
            let lines = err
                .violations
                .iter()
                .map(|v| violation_line(language, v))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "{}\n\n{}\n{}",
                language.text(Message::UnexpectedStructure),
                language.text(Message::ViolationsHeading),
                lines
            )
        }
    }
}

fn violation_line(language: Language, violation: &Violation) -> String {
    let (colon, comma) = match language {
        Language::En => (": ", ", "),
        Language::Zh => ("：", "，"),
    };
    format!(
        "- {}{}{} {}{}{} {}",
        violation.path,
        colon,
        language.text(Message::Expected),
        violation.expected,
        comma,
        language.text(Message::Found),
        violation.found
    )
}

/// Build the fallback record for `contract`
pub fn synthesize(contract: &Contract, language: Language, cause: &FallbackCause) -> NormalizedRecord {
    let mut record = contract.empty_default();
    record.insert(
        contract.primary_field().to_string(),
        Value::String(diagnostic(language, cause)),
    );
    NormalizedRecord::from_map(record)
}
