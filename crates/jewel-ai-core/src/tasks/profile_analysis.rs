//! Style profile from questionnaire answers

use serde::{Deserialize, Serialize};

use super::{analytical, Task};
use crate::config::GenerationSettings;
use crate::contract::{Contract, ObjectShape, ScalarKind};
use crate::error::ContractError;
use crate::language::Language;

const INSTRUCTIONS_EN: &str = "You are a personal jewelry stylist. \
Analyze the customer's questionnaire answers and describe their personality and taste. \
Recommend jewelry styles, materials and colors that suit them, and rate how confident \
you are in the analysis with a number between 0 and 1.";

const INSTRUCTIONS_ZH: &str = "你是一位私人珠宝造型顾问。\
请分析客户的问卷回答，描述其性格特点与审美偏好，推荐适合的珠宝风格、材质与颜色，\
并用 0 到 1 之间的数字给出你对本次分析的把握程度。";

/// One questionnaire answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    /// Question text
    pub question: String,
    /// Customer answer
    pub answer: String,
}

/// Questionnaire results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileAnswers {
    /// Answers in questionnaire order
    pub answers: Vec<QuestionAnswer>,
    /// Personality type computed client-side, if any
    pub personality_type: Option<String>,
}

/// Primary and secondary style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    /// Dominant style
    pub primary_style: String,
    /// Supporting style, empty when none
    #[serde(default)]
    pub secondary_style: String,
    /// How the styles combine
    pub description: String,
}

/// Profile analysis output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAnalysis {
    /// Overview, also carries fallback diagnostics
    pub summary: String,
    /// Traits read from the answers
    pub personality_traits: Vec<String>,
    /// Keywords describing the taste
    pub style_keywords: Vec<String>,
    /// Jewelry styles to suggest
    pub recommended_styles: Vec<String>,
    /// Metals and materials to suggest
    pub recommended_materials: Vec<String>,
    /// Colors as hex codes
    pub color_palette: Vec<String>,
    /// Certainty of the analysis in `[0, 1]`
    pub confidence: f64,
    /// Primary and secondary style
    pub style_profile: StyleProfile,
}

/// Builds a customer style profile
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileAnalysisTask;

impl Task for ProfileAnalysisTask {
    const NAME: &'static str = "profile_analysis";
    type Input = ProfileAnswers;
    type Output = ProfileAnalysis;

    fn contract(&self) -> Result<Contract, ContractError> {
        Contract::builder(Self::NAME)
            .description("Customer style profile")
            .primary("summary")
            .shape(
                ObjectShape::new()
                    .string("summary", "Overview of the customer's personality and taste")
                    .string_array("personalityTraits", "Notable personality traits")
                    .string_array("styleKeywords", "Keywords describing their style")
                    .string_array("recommendedStyles", "Jewelry styles that suit them")
                    .string_array("recommendedMaterials", "Materials that suit them")
                    .string_array("colorPalette", "Colors as hex codes")
                    .scalar(
                        ScalarKind::Number,
                        "confidence",
                        "Confidence in the analysis, 0 to 1",
                    )
                    .object(
                        "styleProfile",
                        "Structured style profile",
                        ObjectShape::new()
                            .string("primaryStyle", "Dominant style")
                            .optional(ScalarKind::String, "secondaryStyle", "Supporting style")
                            .string("description", "How the styles combine"),
                    ),
            )
            .build()
    }

    fn instructions(&self, language: Language) -> &'static str {
        match language {
            Language::En => INSTRUCTIONS_EN,
            Language::Zh => INSTRUCTIONS_ZH,
        }
    }

    fn settings(&self, base: &GenerationSettings) -> GenerationSettings {
        analytical(base)
    }
}
