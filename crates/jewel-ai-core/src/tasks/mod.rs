//! AI-backed tasks of the design assistant
//!
//! Each task binds a typed input, a typed output and the [`Contract`] the
//! output must satisfy. The output struct mirrors its contract field for
//! field, so a normalized record always decodes.
//!
//! | Task | Primary field | Notes |
//! |------|---------------|-------|
//! | [`DesignSuggestionTask`] | `summary` | design ideas with complexity rating |
//! | [`ProfileAnalysisTask`] | `summary` | style profile from questionnaire answers |
//! | [`InspirationAnalysisTask`] | `summary` | themes and motifs of an inspiration image |
//! | [`EnergyImageAnalysisTask`] | `summary` | five-element balance reading |

pub mod design_suggestion;
pub mod energy_image;
pub mod inspiration;
pub mod profile_analysis;

pub use design_suggestion::{
    Complexity, DesignIdea, DesignPreferences, DesignSuggestion, DesignSuggestionTask,
};
pub use energy_image::{
    Element, ElementBalance, ElementScore, EnergyImageAnalysis, EnergyImageAnalysisTask,
    EnergyProfile,
};
pub use inspiration::{
    InspirationAnalysis, InspirationAnalysisTask, InspirationRequest, SuggestedElement,
};
pub use profile_analysis::{
    ProfileAnalysis, ProfileAnalysisTask, ProfileAnswers, QuestionAnswer, StyleProfile,
};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::GenerationSettings;
use crate::contract::Contract;
use crate::error::ContractError;
use crate::language::Language;
use crate::prompt::TaskContext;

/// A structured generation task
pub trait Task: Send + Sync {
    /// Stable identifier used in logs and metrics
    const NAME: &'static str;

    /// Caller-supplied input
    type Input: Serialize + Send + Sync;

    /// Typed view of the normalized record
    type Output: DeserializeOwned + Send;

    /// Output contract
    fn contract(&self) -> Result<Contract, ContractError>;

    /// Role and task description placed at the top of the system prompt
    fn instructions(&self, language: Language) -> &'static str;

    /// Generation settings derived from the caller's defaults
    fn settings(&self, base: &GenerationSettings) -> GenerationSettings {
        base.clone()
    }

    /// Prompt context for an input
    fn context(&self, input: &Self::Input) -> Result<TaskContext, serde_json::Error> {
        TaskContext::from_serializable(input)
    }
}

/// Runtime selector over the built-in tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// [`DesignSuggestionTask`]
    DesignSuggestion,
    /// [`ProfileAnalysisTask`]
    ProfileAnalysis,
    /// [`InspirationAnalysisTask`]
    InspirationAnalysis,
    /// [`EnergyImageAnalysisTask`]
    EnergyImageAnalysis,
}

impl TaskKind {
    /// Every built-in task
    pub const ALL: [TaskKind; 4] = [
        TaskKind::DesignSuggestion,
        TaskKind::ProfileAnalysis,
        TaskKind::InspirationAnalysis,
        TaskKind::EnergyImageAnalysis,
    ];

    /// Identifier, same as the task's `NAME`
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaskKind::DesignSuggestion => DesignSuggestionTask::NAME,
            TaskKind::ProfileAnalysis => ProfileAnalysisTask::NAME,
            TaskKind::InspirationAnalysis => InspirationAnalysisTask::NAME,
            TaskKind::EnergyImageAnalysis => EnergyImageAnalysisTask::NAME,
        }
    }

    /// Output contract
    pub fn contract(&self) -> Result<Contract, ContractError> {
        match self {
            TaskKind::DesignSuggestion => DesignSuggestionTask.contract(),
            TaskKind::ProfileAnalysis => ProfileAnalysisTask.contract(),
            TaskKind::InspirationAnalysis => InspirationAnalysisTask.contract(),
            TaskKind::EnergyImageAnalysis => EnergyImageAnalysisTask.contract(),
        }
    }

    /// System prompt instructions
    pub fn instructions(&self, language: Language) -> &'static str {
        match self {
            TaskKind::DesignSuggestion => DesignSuggestionTask.instructions(language),
            TaskKind::ProfileAnalysis => ProfileAnalysisTask.instructions(language),
            TaskKind::InspirationAnalysis => InspirationAnalysisTask.instructions(language),
            TaskKind::EnergyImageAnalysis => EnergyImageAnalysisTask.instructions(language),
        }
    }

    /// Generation settings for this task
    pub fn settings(&self, base: &GenerationSettings) -> GenerationSettings {
        match self {
            TaskKind::DesignSuggestion => DesignSuggestionTask.settings(base),
            TaskKind::ProfileAnalysis => ProfileAnalysisTask.settings(base),
            TaskKind::InspirationAnalysis => InspirationAnalysisTask.settings(base),
            TaskKind::EnergyImageAnalysis => EnergyImageAnalysisTask.settings(base),
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        TaskKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = TaskKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("Unknown task '{}'. Expected one of: {}", s, names.join(", "))
            })
    }
}

/// Analysis tasks read better with less sampling noise
fn analytical(base: &GenerationSettings) -> GenerationSettings {
    base.clone().with_temperature(base.temperature.min(0.5))
}
