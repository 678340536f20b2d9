//! The structured generation pipeline
//!
//! ```text
//! compile -> generate -> extract -> validate -> normalize
//!                           |           |
//!                           +-----------+--> fallback
//! ```
//!
//! Only the generate stage suspends; everything after it is synchronous and
//! pure, exposed on its own as [`process_response`] for replaying stored
//! replies. A malformed reply always ends in a contract-conformant record.
//! The only `Err` a caller sees for a well-formed task is
//! [`PipelineError::Transport`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::{GenerationClient, GenerationRequest};
use crate::config::GenerationSettings;
use crate::contract::Contract;
use crate::error::{PipelineError, ValidationError};
use crate::extract::extract;
use crate::fallback::{self, FallbackCause};
use crate::language::Language;
use crate::metrics::{Outcome, PipelineMetrics};
use crate::normalize::{normalize, NormalizedRecord};
use crate::prompt::{PromptCompiler, TaskContext};
use crate::tasks::{Task, TaskKind};
use crate::validate::{Violation, ROOT_PATH};

/// Result type for pipeline invocations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Where a returned value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Built from the model's reply
    Generated,
    /// Synthesized locally after the reply could not be used
    Fallback(FallbackCause),
}

impl Provenance {
    /// Metrics outcome for this provenance
    pub fn outcome(&self) -> Outcome {
        match self {
            Provenance::Generated => Outcome::Generated,
            Provenance::Fallback(FallbackCause::Extraction(_)) => Outcome::ExtractionFallback,
            Provenance::Fallback(FallbackCause::Validation(_)) => Outcome::ValidationFallback,
        }
    }
}

/// A contract-conformant value plus how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredOutcome<T = NormalizedRecord> {
    /// The record handed to the caller
    pub value: T,
    /// Whether the model produced it
    pub provenance: Provenance,
}

impl<T> StructuredOutcome<T> {
    /// Whether the value is a fallback record
    pub fn is_fallback(&self) -> bool {
        matches!(self.provenance, Provenance::Fallback(_))
    }

    /// The failure that forced a fallback, if any
    pub fn fallback_cause(&self) -> Option<&FallbackCause> {
        match &self.provenance {
            Provenance::Fallback(cause) => Some(cause),
            Provenance::Generated => None,
        }
    }
}

/// Turn a raw reply into a contract-conformant record
///
/// Never fails: extraction and validation failures produce a fallback.
pub fn process_response(contract: &Contract, raw: &str, language: Language) -> StructuredOutcome {
    let cause = match extract(raw) {
        Ok(value) => match contract.validate(&value) {
            Ok(record) => {
                tracing::debug!(contract = contract.name(), stage = "normalize", "Reply validated");
                return StructuredOutcome {
                    value: normalize(contract, record),
                    provenance: Provenance::Generated,
                };
            }
            Err(err) => FallbackCause::Validation(err),
        },
        Err(err) => FallbackCause::Extraction(err),
    };

    match &cause {
        FallbackCause::Extraction(err) => tracing::warn!(
            contract = contract.name(),
            stage = "extract",
            reason = %err.reason,
            "Falling back: no usable JSON in reply"
        ),
        FallbackCause::Validation(err) => tracing::warn!(
            contract = contract.name(),
            stage = "validate",
            violations = err.violations.len(),
            "Falling back: reply does not match contract"
        ),
    }

    StructuredOutcome {
        value: fallback::synthesize(contract, language, &cause),
        provenance: Provenance::Fallback(cause),
    }
}

/// Compiles prompts, calls the generation client and post-processes replies
///
/// Holds no per-invocation state; one pipeline can serve any number of
/// concurrent invocations.
#[derive(Debug)]
pub struct StructuredPipeline<C> {
    client: C,
    settings: GenerationSettings,
    compiler: PromptCompiler,
    metrics: Option<PipelineMetrics>,
}

impl<C: GenerationClient> StructuredPipeline<C> {
    /// Create a pipeline around a client
    pub fn new(client: C, settings: GenerationSettings) -> Self {
        Self {
            client,
            settings,
            compiler: PromptCompiler::new(),
            metrics: None,
        }
    }

    /// Record invocation metrics
    pub fn with_metrics(mut self, metrics: PipelineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Default generation settings
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// The underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Offline tail of the pipeline, see [`process_response`]
    pub fn process_response(contract: &Contract, raw: &str, language: Language) -> StructuredOutcome {
        process_response(contract, raw, language)
    }

    /// Run an ad-hoc contract with the pipeline's default settings
    pub async fn run(
        &self,
        contract: &Contract,
        instructions: &str,
        context: &TaskContext,
        language: Language,
    ) -> Result<StructuredOutcome> {
        self.invoke(contract, instructions, context, language, &self.settings)
            .await
    }

    /// Run a built-in task selected at runtime with an untyped input
    pub async fn run_kind(
        &self,
        kind: TaskKind,
        input: &Value,
        language: Language,
    ) -> Result<StructuredOutcome> {
        let contract = kind.contract()?;
        let context = TaskContext::from_serializable(input)
            .map_err(|e| PipelineError::InvalidInput(e.to_string()))?;
        let settings = kind.settings(&self.settings);
        self.invoke(
            &contract,
            kind.instructions(language),
            &context,
            language,
            &settings,
        )
        .await
    }

    /// Run a typed task and decode the record into its output type
    pub async fn run_task<T: Task>(
        &self,
        task: &T,
        input: &T::Input,
        language: Language,
    ) -> Result<StructuredOutcome<T::Output>> {
        let contract = task.contract()?;
        let context = task
            .context(input)
            .map_err(|e| PipelineError::InvalidInput(e.to_string()))?;
        let settings = task.settings(&self.settings);
        let outcome = self
            .invoke(
                &contract,
                task.instructions(language),
                &context,
                language,
                &settings,
            )
            .await?;
        decode_outcome(&contract, language, outcome)
    }

    async fn invoke(
        &self,
        contract: &Contract,
        instructions: &str,
        context: &TaskContext,
        language: Language,
        settings: &GenerationSettings,
    ) -> Result<StructuredOutcome> {
        let span = tracing::info_span!(
            "structured_generation",
            task = contract.name(),
            invocation_id = %Uuid::new_v4(),
            language = %language,
        );

        async move {
            let started = Instant::now();
            let prompt = self
                .compiler
                .compile(contract, instructions, context, language);
            let request = GenerationRequest::new(prompt, settings)?;
            tracing::debug!(stage = "generate", model = %request.model, "Sending generation request");

            let raw = match self.client.generate(&request).await {
                Ok(raw) => raw,
                Err(source) => {
                    tracing::error!(stage = "generate", error = %source, "Generation service failed");
                    self.observe(contract.name(), Outcome::TransportError, started);
                    return Err(PipelineError::Transport { language, source });
                }
            };

            let outcome = process_response(contract, &raw, language);
            self.observe(contract.name(), outcome.provenance.outcome(), started);
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    fn observe(&self, task: &str, outcome: Outcome, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record(task, outcome);
            metrics.observe_duration(task, started.elapsed().as_secs_f64());
        }
    }
}

/// Decode a normalized outcome into a task's output type
///
/// A record the output type rejects is treated like a reply that failed
/// validation. If even the fallback record is rejected, the output type and
/// the contract disagree and the error is returned.
pub fn decode_outcome<O: DeserializeOwned>(
    contract: &Contract,
    language: Language,
    outcome: StructuredOutcome,
) -> Result<StructuredOutcome<O>> {
    let StructuredOutcome { value, provenance } = outcome;
    let error = match serde_json::from_value::<O>(value.into_value()) {
        Ok(value) => return Ok(StructuredOutcome { value, provenance }),
        Err(e) => e,
    };

    tracing::warn!(
        contract = contract.name(),
        stage = "decode",
        error = %error,
        "Normalized record rejected by output type"
    );

    let cause = FallbackCause::Validation(ValidationError::new(vec![Violation::new(
        ROOT_PATH,
        contract.name(),
        error.to_string(),
    )]));
    let record = fallback::synthesize(contract, language, &cause);
    let value = serde_json::from_value::<O>(record.into_value())
        .map_err(|e| PipelineError::ContractMismatch(format!("{}: {}", contract.name(), e)))?;

    Ok(StructuredOutcome {
        value,
        provenance: Provenance::Fallback(cause),
    })
}
