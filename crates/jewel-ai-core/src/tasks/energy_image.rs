//! Five-element energy reading for crystal jewelry
//!
//! Elements follow the traditional wood/fire/earth/metal/water cycle. The
//! first listed element doubles as the fallback value.

use serde::{Deserialize, Serialize};

use super::{analytical, Task};
use crate::config::GenerationSettings;
use crate::contract::{Contract, ObjectShape, ScalarKind};
use crate::error::ContractError;
use crate::language::Language;

const ELEMENTS: &[&str] = &["wood", "fire", "earth", "metal", "water"];

const INSTRUCTIONS_EN: &str = "You are a crystal jewelry consultant versed in the five elements \
(wood, fire, earth, metal, water). Interpret the customer's energy questionnaire results, \
explain the balance between the elements, and recommend crystals, colors and a way of wearing \
them that supports the customer's intention.";

const INSTRUCTIONS_ZH: &str = "你是一位精通五行（木、火、土、金、水）的水晶饰品顾问。\
请解读客户的能量问卷结果，说明各元素之间的平衡关系，\
并推荐有助于实现客户心愿的水晶、颜色和佩戴方式。";

/// One of the five elements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// Growth
    #[default]
    Wood,
    /// Passion
    Fire,
    /// Stability
    Earth,
    /// Clarity
    Metal,
    /// Intuition
    Water,
}

/// Questionnaire score for one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementScore {
    /// Scored element
    pub element: Element,
    /// Questionnaire score
    pub score: f64,
}

/// Energy questionnaire results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnergyProfile {
    /// Element with the highest score, if already computed
    pub dominant_element: Option<Element>,
    /// Per-element scores
    pub element_scores: Vec<ElementScore>,
    /// What the customer hopes the piece will help with
    pub intention: String,
}

/// Interpretation of one element's score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBalance {
    /// Interpreted element
    pub element: Element,
    /// Score the model assigned
    pub score: f64,
    /// What the score means for the customer
    pub interpretation: String,
}

/// Energy image analysis output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyImageAnalysis {
    /// Overview, also carries fallback diagnostics
    pub summary: String,
    /// The strongest element
    pub dominant_element: Element,
    /// Per-element interpretation
    pub element_balance: Vec<ElementBalance>,
    /// Crystals that support the intention
    pub recommended_crystals: Vec<String>,
    /// Colors as hex codes
    pub color_palette: Vec<String>,
    /// How and when to wear the piece
    pub wearing_advice: String,
    /// Short affirmation to go with the piece
    #[serde(default)]
    pub affirmation: String,
}

/// Produces an energy reading
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyImageAnalysisTask;

impl Task for EnergyImageAnalysisTask {
    const NAME: &'static str = "energy_image_analysis";
    type Input = EnergyProfile;
    type Output = EnergyImageAnalysis;

    fn contract(&self) -> Result<Contract, ContractError> {
        Contract::builder(Self::NAME)
            .description("Five-element energy reading")
            .primary("summary")
            .shape(
                ObjectShape::new()
                    .string("summary", "Overview of the customer's energy")
                    .scalar(
                        ScalarKind::Enum(ELEMENTS),
                        "dominantElement",
                        "The strongest element",
                    )
                    .object_array(
                        "elementBalance",
                        "One entry per element",
                        ObjectShape::new()
                            .scalar(ScalarKind::Enum(ELEMENTS), "element", "Element name")
                            .scalar(ScalarKind::Number, "score", "Relative strength")
                            .string("interpretation", "What the score means"),
                    )
                    .string_array("recommendedCrystals", "Crystals to wear")
                    .string_array("colorPalette", "Colors as hex codes")
                    .string("wearingAdvice", "How and when to wear the crystals")
                    .optional(ScalarKind::String, "affirmation", "A short affirmation"),
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
