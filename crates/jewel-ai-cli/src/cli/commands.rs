//! CLI command definitions for Jewel AI
//!
//! Provides Clap-based commands for inspecting task contracts, compiling
//! prompts, replaying stored replies and running live generations.

use clap::{Parser, Subcommand};
use jewel_ai_core::{
    process_response, AppConfig, HttpGenerationClient, Language, PromptCompiler,
    StructuredPipeline, TaskContext, TaskKind,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::output::{self, OutcomeOutput, OutputFormat};
use super::ExitCode;
use crate::error::{CliError, Result};

/// Jewel AI CLI
///
/// Inspect contracts and run replies through the structured output pipeline.
#[derive(Parser, Debug)]
#[command(name = "jewel-ai")]
#[command(about = "Jewel AI - Structured output pipeline for the jewelry design assistant", long_about = None)]
#[command(version)]
pub struct JewelCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a task's output schema document
    Schema {
        /// Task identifier, e.g. design_suggestion
        #[arg(short, long)]
        task: TaskKind,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Compile and print the prompts for a task input
    Prompt {
        /// Task identifier
        #[arg(short, long)]
        task: TaskKind,

        /// Task input as a JSON or YAML file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output language tag (en, zh, zh-CN, ...)
        #[arg(short, long, default_value = "en")]
        language: String,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Run a stored model reply through extraction, validation and normalization
    ///
    /// Exits with 1 when the reply had to be replaced by a fallback record.
    Replay {
        /// Task identifier
        #[arg(short, long)]
        task: TaskKind,

        /// File holding the raw model reply
        #[arg(short, long)]
        response: PathBuf,

        /// Language for fallback diagnostics
        #[arg(short, long, default_value = "en")]
        language: String,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Call the generation service and print the structured result
    Generate {
        /// Task identifier
        #[arg(short, long)]
        task: TaskKind,

        /// Task input as a JSON or YAML file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output language tag
        #[arg(short, long, default_value = "en")]
        language: String,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Generation service endpoint, overriding the configuration
        #[arg(long, env = "JEWEL_AI_ENDPOINT")]
        endpoint: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },
}

/// Execute the schema command
pub fn execute_schema(task: TaskKind, format: Option<OutputFormat>) -> Result<ExitCode> {
    let contract = task.contract().map_err(|e| CliError::InternalError(e.to_string()))?;
    output::render_schema(&contract, format.unwrap_or_default())?;
    Ok(ExitCode::Success)
}

/// Execute the prompt command
pub fn execute_prompt(
    task: TaskKind,
    input: Option<PathBuf>,
    language: &str,
    format: Option<OutputFormat>,
) -> Result<ExitCode> {
    let language = Language::from_tag(Some(language));
    let contract = task.contract().map_err(|e| CliError::InternalError(e.to_string()))?;
    let context = load_context(input.as_deref())?;

    let prompt = PromptCompiler::new().compile(
        &contract,
        task.instructions(language),
        &context,
        language,
    );
    output::render_prompt(&prompt, format.unwrap_or_default())?;
    Ok(ExitCode::Success)
}

/// Execute the replay command
pub fn execute_replay(
    task: TaskKind,
    response: PathBuf,
    language: &str,
    format: Option<OutputFormat>,
) -> Result<ExitCode> {
    let language = Language::from_tag(Some(language));
    let contract = task.contract().map_err(|e| CliError::InternalError(e.to_string()))?;
    let raw = read_file(&response)?;

    let outcome = process_response(&contract, &raw, language);
    let exit_code = ExitCode::from_outcome(outcome.is_fallback());
    OutcomeOutput::from_outcome(task, language, outcome).render(format.unwrap_or_default())?;
    Ok(exit_code)
}

/// Execute the generate command
pub async fn execute_generate(
    task: TaskKind,
    input: Option<PathBuf>,
    language: &str,
    config: Option<PathBuf>,
    endpoint: Option<String>,
    format: Option<OutputFormat>,
) -> Result<ExitCode> {
    let language = Language::from_tag(Some(language));
    let context_value = load_input(input.as_deref())?;

    let mut app_config = match &config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    }
    .with_env_overrides()?;
    if let Some(endpoint) = endpoint {
        app_config.client.endpoint = endpoint;
        app_config.validate()?;
    }
    tracing::debug!(config = ?app_config, "Loaded configuration");

    let client = HttpGenerationClient::with_config(app_config.client)
        .map_err(|e| CliError::InternalError(e.to_string()))?;
    let pipeline = StructuredPipeline::new(client, app_config.generation);

    let outcome = pipeline.run_kind(task, &context_value, language).await?;
    let exit_code = ExitCode::from_outcome(outcome.is_fallback());
    OutcomeOutput::from_outcome(task, language, outcome).render(format.unwrap_or_default())?;
    Ok(exit_code)
}

fn load_context(path: Option<&Path>) -> Result<TaskContext> {
    let value = load_input(path)?;
    TaskContext::from_serializable(&value).map_err(|e| CliError::invalid_input(e.to_string()))
}

/// Load a task input file; no file means an empty object
fn load_input(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Object(Default::default()));
    };
    let content = read_file(path)?;
    let value = parse_input_file(path, &content)?;
    if !value.is_object() {
        return Err(CliError::invalid_input(format!(
            "Task input '{}' must be an object",
            path.display()
        )));
    }
    Ok(value)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        CliError::file_error(format!("Failed to read '{}': {}", path.display(), e))
    })
}

/// Parse an input file based on its extension
fn parse_input_file(path: &Path, content: &str) -> Result<Value> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(content)
            .map_err(|e| CliError::parse_error(format!("Invalid YAML: {}", e))),
        _ => serde_json::from_str(content)
            .map_err(|e| CliError::parse_error(format!("Invalid JSON: {}", e))),
    }
}
