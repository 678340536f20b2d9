//! Reading an inspiration image for jewelry motifs

use serde::{Deserialize, Serialize};

use super::Task;
use crate::contract::{Contract, ObjectShape};
use crate::error::ContractError;
use crate::language::Language;

const INSTRUCTIONS_EN: &str = "You are a jewelry designer looking at a customer's inspiration image. \
From the description of the image and the customer's notes, identify the themes, \
motifs, colors and mood, and suggest design elements that would carry them into a piece of jewelry.";

const INSTRUCTIONS_ZH: &str = "你是一位正在查看客户灵感图片的珠宝设计师。\
请根据图片描述和客户备注，提炼其中的主题、图案元素、颜色与氛围，\
并建议可以将这些特点融入珠宝作品的设计元素。";

/// An inspiration image described in text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspirationRequest {
    /// What the image shows
    pub image_description: String,
    /// What the customer likes about it
    pub notes: Option<String>,
}

/// A design element derived from the image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedElement {
    /// Element name
    pub name: String,
    /// Why it fits
    pub rationale: String,
}

/// Inspiration analysis output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspirationAnalysis {
    /// Overview, also carries fallback diagnostics
    pub summary: String,
    /// Overarching themes
    pub themes: Vec<String>,
    /// Shapes and patterns worth reusing
    pub motifs: Vec<String>,
    /// Colors as hex codes
    pub color_palette: Vec<String>,
    /// Overall mood
    pub mood: String,
    /// Design elements to carry over
    pub suggested_elements: Vec<SuggestedElement>,
}

/// Analyzes inspiration images
#[derive(Debug, Clone, Copy, Default)]
pub struct InspirationAnalysisTask;

impl Task for InspirationAnalysisTask {
    const NAME: &'static str = "inspiration_analysis";
    type Input = InspirationRequest;
    type Output = InspirationAnalysis;

    fn contract(&self) -> Result<Contract, ContractError> {
        Contract::builder(Self::NAME)
            .description("Inspiration image reading")
            .primary("summary")
            .shape(
                ObjectShape::new()
                    .string("summary", "What the image says about the customer's taste")
                    .string_array("themes", "Overarching themes")
                    .string_array("motifs", "Shapes and patterns worth reusing")
                    .string_array("colorPalette", "Colors as hex codes")
                    .string("mood", "Overall mood")
                    .object_array(
                        "suggestedElements",
                        "Design elements to carry over",
                        ObjectShape::new()
                            .string("name", "Element name")
                            .string("rationale", "Why it fits"),
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
}
