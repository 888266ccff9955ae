//! Preset document mapping (`~/.lmstudio/config-presets/*.preset.json`).

use crate::model::{ParsedModelfile, preset_identifier};

use super::tokens::bos_token;
use super::types::*;

const SYSTEM_MARKER: &str = "<|system|>";
const USER_MARKER: &str = "<|user|>";
const ASSISTANT_MARKER: &str = "<|assistant|>";
const EMPTY_THINK: &str = "<think></think>";

/// Role markers found in a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Markers {
    system: bool,
    user: bool,
    assistant: bool,
    empty_think: bool,
}

impl Markers {
    fn detect(template: &str) -> Self {
        Self {
            system: template.contains(SYSTEM_MARKER),
            user: template.contains(USER_MARKER),
            assistant: template.contains(ASSISTANT_MARKER),
            empty_think: template.contains(EMPTY_THINK),
        }
    }
}

fn manual_template(template: &str, markers: Markers) -> ManualPromptTemplate {
    let mut manual = ManualPromptTemplate::default();
    if markers.system {
        manual.before_system = format!("{}{}\n", bos_token(template), SYSTEM_MARKER);
    }
    if markers.user {
        manual.before_user = format!("{USER_MARKER}\n");
    }
    if markers.assistant {
        manual.after_user = format!("{ASSISTANT_MARKER}\n");
    }
    if markers.empty_think {
        manual.after_user.push_str(EMPTY_THINK);
        manual.after_user.push('\n');
    }
    manual
}

/// Map a parsed Modelfile into an LM Studio preset named `display_name`.
///
/// The system prompt is left out when the template pre-fills an empty
/// `<think></think>` block.
pub fn to_lmstudio_preset(parsed: &ParsedModelfile, display_name: &str) -> LmStudioPreset {
    let mut preset = LmStudioPreset {
        identifier: preset_identifier(display_name),
        name: display_name.to_string(),
        changed: true,
        operation: FieldGroup::default(),
        load: FieldGroup::default(),
    };

    if !parsed.has_template() {
        return preset;
    }

    let markers = Markers::detect(&parsed.template);
    preset.operation.push(
        KEY_PROMPT_TEMPLATE,
        FieldValue::Manual(ManualPromptTemplateValue {
            kind: "manual".to_string(),
            stop_strings: Vec::new(),
            manual_prompt_template: manual_template(&parsed.template, markers),
        }),
    );
    preset
        .operation
        .push(KEY_STOP_STRINGS, FieldValue::List(parsed.stop_strings()));
    if parsed.has_system() && !markers.empty_think {
        preset
            .operation
            .push(KEY_SYSTEM_PROMPT, FieldValue::Text(parsed.system.clone()));
    }

    preset
}
