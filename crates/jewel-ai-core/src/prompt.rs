//! Prompt compilation
//!
//! Turns a contract, task instructions and task context into the
//! `{system, user}` prompt pair. Compilation is deterministic: the same
//! inputs always produce byte-identical prompts.

use serde::Serialize;
use serde_json::Value;

use crate::contract::Contract;
use crate::language::Language;

/// Ordered key/value description of a caller's input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskContext {
    entries: Vec<(String, String)>,
}

impl TaskContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Flatten a serializable input into context entries
    ///
    /// Top-level fields become entries in declaration order. Arrays of
    /// scalars are joined with `, `; nested objects are rendered as compact
    /// JSON. Nulls, empty strings and empty arrays are left out.
    pub fn from_serializable<T: Serialize>(input: &T) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(input)?;
        let mut context = Self::new();
        match value {
            Value::Object(map) => {
                for (key, value) in map {
                    if let Some(text) = render_value(&value) {
                        context.entries.push((key, text));
                    }
                }
            }
            other => {
                if let Some(text) = render_value(&other) {
                    context.entries.push(("input".to_string(), text));
                }
            }
        }
        Ok(context)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => {
            let parts: Vec<String> = items.iter().filter_map(render_value).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        other => Some(other.to_string()),
    }
}

/// System and user prompt pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledPrompt {
    /// Instructions, output rules and the schema document
    pub system_prompt: String,
    /// Serialized task input
    pub user_prompt: String,
}

/// Renders prompts for a contract
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptCompiler;

impl PromptCompiler {
    /// Create a compiler
    pub fn new() -> Self {
        Self
    }

    /// Compile the prompt pair
    pub fn compile(
        &self,
        contract: &Contract,
        instructions: &str,
        context: &TaskContext,
        language: Language,
    ) -> CompiledPrompt {
        CompiledPrompt {
            system_prompt: self.system_prompt(contract, instructions, language),
            user_prompt: self.user_prompt(context, language),
        }
    }

    /// Render the system prompt
    pub fn system_prompt(&self, contract: &Contract, instructions: &str, language: Language) -> String {
        let rules = match language {
            Language::En => format!(
                "Respond in {lang}.\n\
                 Inside any string field, separate paragraphs with a literal double newline (\\n\\n).\n\
                 Write list-like content inside strings as lines starting with \"- \".\n\
                 Your response MUST be a single JSON object that matches the following schema exactly. \
                 Do not add any text before or after the JSON object.",
                lang = language.prompt_name()
            ),
            Language::Zh => format!(
                "请使用{lang}回答。\n\
                 在任何字符串字段中，段落之间请使用字面的双换行符（\\n\\n）分隔。\n\
                 类似列表的内容请在字符串中写成以 \"- \" 开头的行。\n\
                 你的回答必须是一个严格符合以下结构定义的 JSON 对象，JSON 对象前后不要添加任何文字。",
                lang = language.prompt_name()
            ),
        };
        let schema_heading = match language {
            Language::En => "Schema:",
            Language::Zh => "结构定义：",
        };

        let mut prompt = String::new();
        let instructions = instructions.trim();
        if !instructions.is_empty() {
            prompt.push_str(instructions);
            prompt.push_str("\n\n");
        }
        prompt.push_str(&rules);
        prompt.push_str("\n\n");
        prompt.push_str(schema_heading);
        prompt.push('\n');
        prompt.push_str(&contract.schema_document());
        prompt
    }

    /// Render the user prompt
    pub fn user_prompt(&self, context: &TaskContext, language: Language) -> String {
        let (heading, empty) = match language {
            Language::En => ("Input:", "(no additional input)"),
            Language::Zh => ("输入：", "（无额外输入）"),
        };
        let mut prompt = String::from(heading);
        if context.is_empty() {
            prompt.push('\n');
            prompt.push_str(empty);
        }
        for (key, value) in context.entries() {
            prompt.push_str(&format!("\n- {}: {}", key, value));
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ObjectShape;

    fn contract() -> Contract {
        Contract::builder("palette")
            .description("Color advice")
            .primary("summary")
            .shape(
                ObjectShape::new()
                    .string("summary", "Overview")
                    .string_array("colorPalette", "Hex colors"),
            )
            .build()
            .unwrap()
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Prefs {
        occasion: String,
        preferred_metals: Vec<String>,
        budget: Option<u32>,
        notes: String,
        scores: Vec<Value>,
    }

    #[test]
    fn test_context_from_serializable() {
        let prefs = Prefs {
            occasion: " wedding ".to_string(),
            preferred_metals: vec!["gold".to_string(), "platinum".to_string()],
            budget: None,
            notes: "  ".to_string(),
            scores: vec![serde_json::json!({"fire": 3})],
        };
        let context = TaskContext::from_serializable(&prefs).unwrap();
        assert_eq!(
            context.entries(),
            &[
                ("occasion".to_string(), "wedding".to_string()),
                ("preferredMetals".to_string(), "gold, platinum".to_string()),
                ("scores".to_string(), "[{\"fire\":3}]".to_string()),
            ]
        );
    }

    #[test]
    fn test_system_prompt_embeds_schema_verbatim() {
        let contract = contract();
        let compiler = PromptCompiler::new();
        for language in [Language::En, Language::Zh] {
            let prompt = compiler.system_prompt(&contract, "You are a jeweler.", language);
            assert!(prompt.starts_with("You are a jeweler."));
            assert!(prompt.ends_with(&contract.schema_document()));
            assert!(prompt.contains(language.prompt_name()));
            assert!(prompt.contains("\\n\\n"));
        }
    }

    #[test]
    fn test_compile_is_deterministic() {
        let contract = contract();
        let context = TaskContext::new().with("occasion", "gala");
        let compiler = PromptCompiler::new();
        let a = compiler.compile(&contract, "x", &context, Language::Zh);
        let b = compiler.compile(&contract, "x", &context, Language::Zh);
        assert_eq!(a, b);
        assert_eq!(a.user_prompt, "输入：\n- occasion: gala");
    }

    #[test]
    fn test_empty_context() {
        let prompt = PromptCompiler::new().user_prompt(&TaskContext::new(), Language::En);
        assert_eq!(prompt, "Input:\n(no additional input)");
    }
}
