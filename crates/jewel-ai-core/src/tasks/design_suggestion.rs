//! Design suggestions from a customer's preferences

use serde::{Deserialize, Serialize};

use super::Task;
use crate::contract::{Contract, ObjectShape, ScalarKind};
use crate::error::ContractError;
use crate::language::Language;

const COMPLEXITY_LEVELS: &[&str] = &["low", "medium", "high"];

const INSTRUCTIONS_EN: &str = "You are an experienced jewelry designer. \
Based on the customer's preferences, propose a cohesive jewelry design: \
describe the overall concept, a color palette as hex codes, suitable materials, \
gemstones and craftsmanship techniques, and two to four concrete design ideas.";

const INSTRUCTIONS_ZH: &str = "你是一位经验丰富的珠宝设计师。\
请根据客户的偏好提出一套完整的珠宝设计方案：描述整体设计理念、以十六进制色值表示的配色、\
适合的材质、宝石与工艺，并给出两到四个具体的设计构想。";

/// Customer design preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignPreferences {
    /// Occasion the piece is for
    pub occasion: String,
    /// Preferred style, e.g. "minimalist"
    pub style: String,
    /// Free-form budget
    pub budget: Option<String>,
    /// Preferred metals
    pub metals: Vec<String>,
    /// Preferred gemstones
    pub gemstones: Vec<String>,
    /// Preferred colors
    pub colors: Vec<String>,
    /// Anything else the customer mentioned
    pub notes: Option<String>,
}

/// Estimated production difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Simple construction, few stones
    #[default]
    Low,
    /// Moderate setting or finishing work
    Medium,
    /// Intricate work such as pavé or filigree
    High,
}

/// One concrete design idea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignIdea {
    /// Short name of the idea
    pub title: String,
    /// What the piece looks like
    pub description: String,
    /// Distinguishing details
    pub key_features: Vec<String>,
}

/// Design suggestion output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSuggestion {
    /// Short overview, also carries fallback diagnostics
    pub summary: String,
    /// The overall design concept
    pub design_concept: String,
    /// Colors as hex codes
    pub color_palette: Vec<String>,
    /// Recommended metals and materials
    pub materials: Vec<String>,
    /// Recommended gemstones
    pub gemstones: Vec<String>,
    /// Techniques used to make the piece
    pub craftsmanship: Vec<String>,
    /// Concrete design ideas
    pub design_ideas: Vec<DesignIdea>,
    /// Estimated production difficulty
    pub estimated_complexity: Complexity,
    /// How to look after the piece
    #[serde(default)]
    pub care_tips: String,
}

/// Suggests jewelry designs
#[derive(Debug, Clone, Copy, Default)]
pub struct DesignSuggestionTask;

impl Task for DesignSuggestionTask {
    const NAME: &'static str = "design_suggestion";
    type Input = DesignPreferences;
    type Output = DesignSuggestion;

    fn contract(&self) -> Result<Contract, ContractError> {
        Contract::builder(Self::NAME)
            .description("Jewelry design proposal")
            .primary("summary")
            .shape(
                ObjectShape::new()
                    .string("summary", "Short overview of the proposal")
                    .string("designConcept", "The overall design concept")
                    .string_array("colorPalette", "Colors as hex codes, e.g. #C0A062")
                    .string_array("materials", "Recommended metals and materials")
                    .string_array("gemstones", "Recommended gemstones")
                    .string_array("craftsmanship", "Techniques used to make the piece")
                    .object_array(
                        "designIdeas",
                        "Concrete design ideas",
                        ObjectShape::new()
                            .string("title", "Name of the idea")
                            .string("description", "What the piece looks like")
                            .string_array("keyFeatures", "Distinguishing features"),
                    )
                    .scalar(
                        ScalarKind::Enum(COMPLEXITY_LEVELS),
                        "estimatedComplexity",
                        "How hard the piece is to produce",
                    )
                    .optional(ScalarKind::String, "careTips", "How to care for the piece"),
            )
            .build()
    }

    fn instructions(&self, language: Language) -> &'static str {
        match language {
            Language::En => INSTRUCTIONS_EN,
            Language::Zh => INSTRUCTIONS_ZH,
        }
    }
}
