//! Serializable LM Studio configuration shapes. Field names and nesting are
//! what LM Studio reads, so renames here are breaking.

use serde::Serialize;

pub const KEY_PROMPT_TEMPLATE: &str = "llm.prediction.promptTemplate";
pub const KEY_STOP_STRINGS: &str = "llm.prediction.stopStrings";
pub const KEY_SYSTEM_PROMPT: &str = "llm.prediction.systemPrompt";
pub const KEY_TEMPERATURE: &str = "llm.prediction.temperature";
pub const KEY_TOP_P: &str = "llm.prediction.topP";
pub const KEY_TOP_K: &str = "llm.prediction.topK";
pub const KEY_REPEAT_PENALTY: &str = "llm.prediction.repeatPenalty";
pub const KEY_MIN_P: &str = "llm.prediction.minP";
pub const KEY_CONTEXT_LENGTH: &str = "llm.load.contextLength";

/// A single `{ "key": ..., "value": ... }` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigField {
    pub key: String,
    pub value: FieldValue,
}

impl ConfigField {
    pub fn new(key: &str, value: FieldValue) -> Self {
        Self {
            key: key.to_string(),
            value,
        }
    }
}

/// Runtime-typed field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Text(String),
    List(Vec<String>),
    Jinja(JinjaPromptTemplate),
    Manual(ManualPromptTemplateValue),
}

/// Ordered list of fields for one config group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldGroup {
    pub fields: Vec<ConfigField>,
}

impl FieldGroup {
    pub fn push(&mut self, key: &str, value: FieldValue) {
        self.fields.push(ConfigField::new(key, value));
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Flat per-model configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LmStudioConfig {
    pub prediction_config: FieldGroup,
    pub load_model_config: FieldGroup,
}

/// `llm.prediction.promptTemplate` value for the flat config.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JinjaPromptTemplate {
    #[serde(rename = "type")]
    pub kind: String,
    pub jinja_prompt_template: JinjaTemplateDetails,
    pub stop_strings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JinjaTemplateDetails {
    pub template: String,
    pub bos_token: String,
    pub eos_token: String,
    pub input_config: InputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    pub messages_config: MessagesConfig,
    pub use_tools: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesConfig {
    pub content_config: ContentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentConfig {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for InputConfig {
    /// String message content, tools disabled.
    fn default() -> Self {
        Self {
            messages_config: MessagesConfig {
                content_config: ContentConfig {
                    kind: "string".to_string(),
                },
            },
            use_tools: false,
        }
    }
}

/// Preset document (LM Studio 0.3+).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LmStudioPreset {
    pub identifier: String,
    pub name: String,
    pub changed: bool,
    pub operation: FieldGroup,
    pub load: FieldGroup,
}

/// `llm.prediction.promptTemplate` value for presets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualPromptTemplateValue {
    #[serde(rename = "type")]
    pub kind: String,
    pub stop_strings: Vec<String>,
    pub manual_prompt_template: ManualPromptTemplate,
}

/// Literal text placed around each conversational role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualPromptTemplate {
    pub before_system: String,
    pub after_system: String,
    pub before_user: String,
    pub after_user: String,
    pub before_assistant: String,
    pub after_assistant: String,
}
