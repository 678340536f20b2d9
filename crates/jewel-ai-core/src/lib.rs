//! Jewel AI Core
//!
//! Structured output pipeline for the Jewel AI design assistant. Text
//! completion services have no native structured-output mode, so every AI
//! feature goes through the same path: describe the expected JSON in the
//! prompt, pull the JSON back out of free text, check it, clean it, and
//! substitute a conformant fallback when the model misbehaves.
//!
//! ## Features
//!
//! - **Contracts**: Declarative output shapes that drive prompts, validation,
//!   normalization and fallbacks from one definition
//! - **Robust Extraction**: Finds the JSON object inside prose and code fences
//! - **Never-Failing Post-Processing**: Malformed replies become records with a
//!   localized diagnostic instead of errors
//! - **Typed Tasks**: Design suggestions, profile analysis, inspiration and
//!   energy readings with typed inputs and outputs
//! - **HTTP Client**: Retry with exponential backoff for the generation service
//! - **Telemetry**: `tracing` spans per invocation and Prometheus metrics
//!
//! ## Architecture
//!
//! 1. **Contract** (`contract/`): Output shapes and their schema documents.
//! 2. **Prompt** (`prompt`): System and user prompt compilation.
//! 3. **Client** (`client/`): The generation service seam and its HTTP implementation.
//! 4. **Extract** (`extract`): JSON span location and parsing.
//! 5. **Validate** (`validate`): Structural checks with path-addressed violations.
//! 6. **Normalize** (`normalize`): Whitespace and empty-value cleanup.
//! 7. **Fallback** (`fallback`): Diagnostic records for unusable replies.
//! 8. **Pipeline** (`pipeline`): Orchestration, tracing and metrics.
//! 9. **Tasks** (`tasks/`): The built-in task catalog.
//!
//! ## Example
//!
//! ```rust,no_run
//! use jewel_ai_core::{
//!     client::HttpGenerationClient,
//!     config::GenerationSettings,
//!     tasks::{DesignPreferences, DesignSuggestionTask},
//!     Language, StructuredPipeline,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpGenerationClient::new("http://localhost:8080/v1/generate")?;
//!     let pipeline = StructuredPipeline::new(client, GenerationSettings::default());
//!
//!     let input = DesignPreferences {
//!         occasion: "wedding".to_string(),
//!         metals: vec!["platinum".to_string()],
//!         ..Default::default()
//!     };
//!
//!     let outcome = pipeline
//!         .run_task(&DesignSuggestionTask, &input, Language::from_tag(Some("zh-CN")))
//!         .await?;
//!     println!("{}", outcome.value.summary);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod language;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod tasks;
pub mod validate;

pub use client::{GenerationClient, GenerationRequest, HttpGenerationClient};
pub use config::{AppConfig, ClientConfig, GenerationSettings};
pub use contract::{Contract, FieldKind, FieldSpec, ObjectShape, ScalarKind};
pub use error::{
    ConfigError, ContractError, ExtractionError, ExtractionFailure, PipelineError,
    TransportError, ValidationError,
};
pub use fallback::FallbackCause;
pub use language::{Language, Message};
pub use metrics::{Outcome, PipelineMetrics};
pub use normalize::NormalizedRecord;
pub use pipeline::{process_response, Provenance, StructuredOutcome, StructuredPipeline};
pub use prompt::{CompiledPrompt, PromptCompiler, TaskContext};
pub use tasks::{Task, TaskKind};
pub use validate::{ValidatedRecord, Violation};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
