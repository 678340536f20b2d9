//! Output formatting for the Jewel AI CLI
//!
//! Structured output in JSON, YAML, and a colored human-readable layout.

use clap::ValueEnum;
use colored::Colorize;
use jewel_ai_core::{
    CompiledPrompt, Contract, FallbackCause, Language, StructuredOutcome, TaskKind, Violation,
};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

use crate::error::Result;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable layout with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Pipeline outcome prepared for rendering
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeOutput {
    /// Task identifier
    pub task: String,
    /// Language of diagnostics
    pub language: Language,
    /// `generated` or `fallback`
    pub provenance: String,
    /// `extraction` or `validation` when a fallback was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_kind: Option<String>,
    /// Violations behind a validation fallback
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    /// The contract-conformant record
    pub record: Value,
}

impl OutcomeOutput {
    /// Create output from a pipeline outcome
    pub fn from_outcome(task: TaskKind, language: Language, outcome: StructuredOutcome) -> Self {
        let fallback_kind = outcome.fallback_cause().map(|c| c.kind().to_string());
        let violations = match outcome.fallback_cause() {
            Some(FallbackCause::Validation(err)) => err.violations.clone(),
            _ => Vec::new(),
        };
        let provenance = if outcome.is_fallback() {
            "fallback"
        } else {
            "generated"
        };

        Self {
            task: task.to_string(),
            language,
            provenance: provenance.to_string(),
            fallback_kind,
            violations,
            record: outcome.value.into_value(),
        }
    }

    /// Whether the record is a fallback
    pub fn is_fallback(&self) -> bool {
        self.fallback_kind.is_some()
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => render_json(self),
            OutputFormat::Yaml => render_yaml(self),
            OutputFormat::Table => {
                self.render_table();
                Ok(())
            }
        }
    }

    fn render_table(&self) {
        let mut stdout = io::stdout();

        writeln!(stdout).ok();
        writeln!(stdout, "{} {}", "Task:".cyan().bold(), self.task).ok();
        writeln!(stdout, "{}", "=".repeat(60)).ok();

        match &self.fallback_kind {
            None => writeln!(stdout, "{} Generated by the model", "+".green()).ok(),
            Some(kind) => writeln!(stdout, "{} Fallback record ({} failure)", "x".red(), kind).ok(),
        };

        if !self.violations.is_empty() {
            writeln!(stdout).ok();
            writeln!(stdout, "{}", "Violations:".cyan().bold()).ok();
            for violation in &self.violations {
                writeln!(
                    stdout,
                    "  {} {} expected {}, found {}",
                    "!".yellow(),
                    violation.path.cyan(),
                    violation.expected,
                    violation.found.yellow()
                )
                .ok();
            }
        }

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "Record:".cyan().bold()).ok();
        writeln!(stdout, "{}", "-".repeat(60)).ok();
        if let Value::Object(fields) = &self.record {
            for (name, value) in fields {
                write_field(&mut stdout, name, value);
            }
        }

        stdout.flush().ok();
    }
}

fn write_field(stdout: &mut io::Stdout, name: &str, value: &Value) {
    match value {
        Value::String(text) if text.contains('\n') => {
            writeln!(stdout, "{}", format!("{}:", name).bold()).ok();
            for line in text.lines() {
                writeln!(stdout, "  {}", line).ok();
            }
        }
        Value::String(text) => {
            writeln!(stdout, "{} {}", format!("{}:", name).bold(), text).ok();
        }
        Value::Array(items) if items.iter().all(|v| !v.is_object()) => {
            let rendered: Vec<String> = items.iter().map(scalar_text).collect();
            writeln!(
                stdout,
                "{} {}",
                format!("{}:", name).bold(),
                rendered.join(", ").dimmed()
            )
            .ok();
        }
        Value::Array(items) => {
            writeln!(stdout, "{}", format!("{}:", name).bold()).ok();
            for item in items {
                writeln!(stdout, "  - {}", item).ok();
            }
        }
        other => {
            writeln!(stdout, "{} {}", format!("{}:", name).bold(), other).ok();
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a contract's schema document
pub fn render_schema(contract: &Contract, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => render_yaml(&contract.describe().to_value()),
        OutputFormat::Json => {
            println!("{}", contract.schema_document());
            Ok(())
        }
        OutputFormat::Table => {
            let mut stdout = io::stdout();
            writeln!(
                stdout,
                "{} {} (primary field: {})",
                "Contract:".cyan().bold(),
                contract.name(),
                contract.primary_field().green()
            )
            .ok();
            writeln!(stdout, "{}", "-".repeat(60)).ok();
            writeln!(stdout, "{}", contract.schema_document()).ok();
            stdout.flush().ok();
            Ok(())
        }
    }
}

/// Render a compiled prompt pair
pub fn render_prompt(prompt: &CompiledPrompt, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => render_json(prompt),
        OutputFormat::Yaml => render_yaml(prompt),
        OutputFormat::Table => {
            let mut stdout = io::stdout();
            writeln!(stdout, "{}", "System prompt:".cyan().bold()).ok();
            writeln!(stdout, "{}", "-".repeat(60)).ok();
            writeln!(stdout, "{}", prompt.system_prompt).ok();
            writeln!(stdout).ok();
            writeln!(stdout, "{}", "User prompt:".cyan().bold()).ok();
            writeln!(stdout, "{}", "-".repeat(60)).ok();
            writeln!(stdout, "{}", prompt.user_prompt).ok();
            stdout.flush().ok();
            Ok(())
        }
    }
}

fn render_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_yaml<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_yaml::to_string(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jewel_ai_core::process_response;

    #[test]
    fn test_outcome_output_for_generated_record() {
        let contract = TaskKind::InspirationAnalysis.contract().unwrap();
        let raw = serde_json::json!({
            "summary": "Waves",
            "themes": ["sea"],
            "motifs": [],
            "colorPalette": ["#003366"],
            "mood": "calm",
            "suggestedElements": []
        })
        .to_string();
        let outcome = process_response(&contract, &raw, Language::En);
        let output = OutcomeOutput::from_outcome(TaskKind::InspirationAnalysis, Language::En, outcome);

        assert!(!output.is_fallback());
        assert_eq!(output.provenance, "generated");
        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("fallback_kind").is_none());
        assert!(json.get("violations").is_none());
        assert_eq!(json["record"]["mood"], "calm");
    }

    #[test]
    fn test_outcome_output_for_validation_fallback() {
        let contract = TaskKind::InspirationAnalysis.contract().unwrap();
        let outcome = process_response(&contract, r#"{"summary": "only this"}"#, Language::Zh);
        let output = OutcomeOutput::from_outcome(TaskKind::InspirationAnalysis, Language::Zh, outcome);

        assert!(output.is_fallback());
        assert_eq!(output.fallback_kind.as_deref(), Some("validation"));
        assert_eq!(output.violations.len(), 5);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["language"], "zh");
        assert_eq!(json["violations"][0]["path"], "themes");
    }

    #[test]
    fn test_render_formats() {
        let contract = TaskKind::DesignSuggestion.contract().unwrap();
        let outcome = process_response(&contract, "no json here", Language::En);
        let output = OutcomeOutput::from_outcome(TaskKind::DesignSuggestion, Language::En, outcome);
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Yaml] {
            assert!(output.render(format).is_ok());
        }
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Yaml] {
            assert!(render_schema(&contract, format).is_ok());
        }
    }
}
