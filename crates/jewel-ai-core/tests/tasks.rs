//! Integration tests for the built-in task catalog
//!
//! Every task's output type must accept whatever its contract accepts, or a
//! fallback record could not be handed back to a typed caller.

use async_trait::async_trait;
use jewel_ai_core::tasks::{
    Complexity, DesignPreferences, DesignSuggestionTask, Element, EnergyImageAnalysisTask,
    EnergyProfile, InspirationAnalysisTask, InspirationRequest, ProfileAnalysisTask,
    ProfileAnswers,
};
use jewel_ai_core::{
    process_response, GenerationClient, GenerationRequest, GenerationSettings, Language,
    Provenance, StructuredPipeline, Task, TaskKind, TransportError,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

struct FixedClient(String);

#[async_trait]
impl GenerationClient for FixedClient {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, TransportError> {
        Ok(self.0.clone())
    }
}

fn assert_empty_default_round_trips<T: Task>(task: T) {
    let contract = task.contract().unwrap();
    let empty = Value::Object(contract.empty_default());
    assert!(
        contract.validate(&empty).is_ok(),
        "{} empty default does not validate",
        T::NAME
    );
    let decoded: Result<T::Output, _> = serde_json::from_value(empty);
    assert!(decoded.is_ok(), "{} empty default does not decode", T::NAME);
}

fn assert_fallback_decodes<T: Task>(task: T)
where
    T::Output: DeserializeOwned,
{
    let contract = task.contract().unwrap();
    for language in [Language::En, Language::Zh] {
        let outcome = process_response(&contract, "model refused", language);
        assert!(outcome.is_fallback());
        let decoded: Result<T::Output, _> = serde_json::from_value(outcome.value.into_value());
        assert!(decoded.is_ok(), "{} fallback does not decode", T::NAME);
    }
}

#[test]
fn test_every_task_empty_default_validates_and_decodes() {
    assert_empty_default_round_trips(DesignSuggestionTask);
    assert_empty_default_round_trips(ProfileAnalysisTask);
    assert_empty_default_round_trips(InspirationAnalysisTask);
    assert_empty_default_round_trips(EnergyImageAnalysisTask);
}

#[test]
fn test_every_task_fallback_decodes() {
    assert_fallback_decodes(DesignSuggestionTask);
    assert_fallback_decodes(ProfileAnalysisTask);
    assert_fallback_decodes(InspirationAnalysisTask);
    assert_fallback_decodes(EnergyImageAnalysisTask);
}

#[test]
fn test_schema_documents_name_every_top_level_field() {
    for kind in TaskKind::ALL {
        let contract = kind.contract().unwrap();
        let document = contract.schema_document();
        let parsed: Value = serde_json::from_str(&document).unwrap();
        for field in contract.fields() {
            assert!(
                parsed["properties"].get(&field.name).is_some(),
                "{} schema is missing {}",
                kind,
                field.name
            );
        }
    }
}

#[tokio::test]
async fn test_design_suggestion_typed_run() {
    let reply = json!({
        "summary": "  A luminous bridal set.  ",
        "designConcept": "Moonlight on water",
        "colorPalette": ["#F5F5F5", " ", "#C0C0C0 "],
        "materials": ["platinum"],
        "gemstones": ["moonstone", "diamond"],
        "craftsmanship": ["milgrain"],
        "designIdeas": [
            {"title": " Tide ", "description": "A wave band", "keyFeatures": ["pavé", ""]}
        ],
        "estimatedComplexity": "medium",
        "notes": "extra keys are dropped"
    });
    let pipeline = StructuredPipeline::new(
        FixedClient(format!("Here is the design:\n```json\n{}\n```", reply)),
        GenerationSettings::default(),
    );

    let input = DesignPreferences {
        occasion: "wedding".to_string(),
        metals: vec!["platinum".to_string()],
        ..Default::default()
    };
    let outcome = pipeline
        .run_task(&DesignSuggestionTask, &input, Language::En)
        .await
        .unwrap();

    assert_eq!(outcome.provenance, Provenance::Generated);
    let design = outcome.value;
    assert_eq!(design.summary, "A luminous bridal set.");
    assert_eq!(design.color_palette, vec!["#F5F5F5", "#C0C0C0"]);
    assert_eq!(design.design_ideas[0].title, "Tide");
    assert_eq!(design.design_ideas[0].key_features, vec!["pavé"]);
    assert_eq!(design.estimated_complexity, Complexity::Medium);
    assert_eq!(design.care_tips, "");
}

#[tokio::test]
async fn test_energy_reading_with_bad_enum_falls_back() {
    let reply = json!({
        "summary": "Strong fire energy",
        "dominantElement": "plasma",
        "elementBalance": [],
        "recommendedCrystals": ["carnelian"],
        "colorPalette": ["#FF4500"],
        "wearingAdvice": "Left wrist"
    });
    let pipeline = StructuredPipeline::new(
        FixedClient(reply.to_string()),
        GenerationSettings::default(),
    );

    let outcome = pipeline
        .run_task(
            &EnergyImageAnalysisTask,
            &EnergyProfile {
                intention: "courage".to_string(),
                ..Default::default()
            },
            Language::Zh,
        )
        .await
        .unwrap();

    assert!(outcome.is_fallback());
    assert_eq!(outcome.value.dominant_element, Element::Wood);
    assert!(outcome.value.summary.contains("dominantElement"));
    assert!(outcome.value.recommended_crystals.is_empty());
}

#[tokio::test]
async fn test_profile_and_inspiration_typed_runs() {
    let profile_reply = json!({
        "summary": "Calm and classic",
        "personalityTraits": ["thoughtful"],
        "styleKeywords": ["timeless"],
        "recommendedStyles": ["vintage"],
        "recommendedMaterials": ["rose gold"],
        "colorPalette": ["#B76E79"],
        "confidence": 0.82,
        "styleProfile": {"primaryStyle": "classic", "description": "Quiet elegance"}
    });
    let pipeline = StructuredPipeline::new(
        FixedClient(profile_reply.to_string()),
        GenerationSettings::default(),
    );
    let profile = pipeline
        .run_task(&ProfileAnalysisTask, &ProfileAnswers::default(), Language::En)
        .await
        .unwrap();
    assert!(!profile.is_fallback());
    assert_eq!(profile.value.confidence, 0.82);
    assert_eq!(profile.value.style_profile.secondary_style, "");

    let pipeline = StructuredPipeline::new(
        FixedClient("The image shows waves.".to_string()),
        GenerationSettings::default(),
    );
    let inspiration = pipeline
        .run_task(
            &InspirationAnalysisTask,
            &InspirationRequest {
                image_description: "Waves at dusk".to_string(),
                notes: None,
            },
            Language::En,
        )
        .await
        .unwrap();
    assert!(inspiration.is_fallback());
    assert!(inspiration.value.summary.ends_with("The image shows waves."));
    assert!(inspiration.value.suggested_elements.is_empty());
}

#[tokio::test]
async fn test_run_kind_with_untyped_input() {
    let pipeline = StructuredPipeline::new(
        FixedClient(r#"{"summary": "ok"}"#.to_string()),
        GenerationSettings::default(),
    );
    let outcome = pipeline
        .run_kind(
            TaskKind::InspirationAnalysis,
            &json!({"imageDescription": "A forest"}),
            Language::En,
        )
        .await
        .unwrap();
    assert!(outcome.is_fallback());
    assert_eq!(outcome.value.get("themes"), Some(&json!([])));
}
