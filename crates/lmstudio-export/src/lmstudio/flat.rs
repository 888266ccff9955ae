//! Flat `predictionConfig` / `loadModelConfig` mapping.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::ParsedModelfile;
use crate::template::go_template_to_jinja;

use super::tokens::{bos_token, eos_token};
use super::types::*;

/// Target numeric type for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coercion {
    Float,
    Integer,
}

/// Config group a parameter lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Prediction,
    Load,
}

/// Modelfile parameter name → LM Studio key, value type, group.
const PARAMETER_MAP: [(&str, &str, Coercion, Group); 6] = [
    ("temperature", KEY_TEMPERATURE, Coercion::Float, Group::Prediction),
    ("top_p", KEY_TOP_P, Coercion::Float, Group::Prediction),
    ("top_k", KEY_TOP_K, Coercion::Integer, Group::Prediction),
    ("repeat_penalty", KEY_REPEAT_PENALTY, Coercion::Float, Group::Prediction),
    ("min_p", KEY_MIN_P, Coercion::Float, Group::Prediction),
    ("num_ctx", KEY_CONTEXT_LENGTH, Coercion::Integer, Group::Load),
];

fn coerce(value: &str, coercion: Coercion) -> Option<FieldValue> {
    match coercion {
        Coercion::Float => value
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(FieldValue::Float),
        Coercion::Integer => value.parse::<i64>().ok().map(FieldValue::Integer),
    }
}

fn expected_name(coercion: Coercion) -> &'static str {
    match coercion {
        Coercion::Float => "float",
        Coercion::Integer => "integer",
    }
}

/// Build the Jinja prompt-template field value for `parsed.template`.
fn jinja_template(parsed: &ParsedModelfile, diag: &dyn Diagnostics) -> JinjaPromptTemplate {
    let template = go_template_to_jinja(&parsed.template);
    diag.emit(Diagnostic::TemplateConverted {
        original_len: parsed.template.len(),
        converted_len: template.len(),
    });
    JinjaPromptTemplate {
        kind: "jinja".to_string(),
        jinja_prompt_template: JinjaTemplateDetails {
            bos_token: bos_token(&parsed.template).to_string(),
            eos_token: eos_token(&parsed.template).to_string(),
            template,
            input_config: InputConfig::default(),
        },
        stop_strings: parsed.stop_strings(),
    }
}

/// Map a parsed Modelfile into LM Studio's flat config document.
///
/// Stop sequences travel inside the prompt template; other supported
/// parameters use their first value. Unsupported or non-numeric parameters are
/// reported to `diag` and left out.
pub fn to_lmstudio_config(parsed: &ParsedModelfile, diag: &dyn Diagnostics) -> LmStudioConfig {
    let mut config = LmStudioConfig::default();

    if parsed.has_template() {
        config.prediction_config.push(
            KEY_PROMPT_TEMPLATE,
            FieldValue::Jinja(jinja_template(parsed, diag)),
        );
    }

    for (name, values) in &parsed.parameters {
        if name == "stop" {
            continue;
        }
        let Some(value) = values.first() else {
            continue;
        };
        let Some(&(_, key, coercion, group)) = PARAMETER_MAP
            .iter()
            .find(|(n, ..)| *n == name.as_str())
        else {
            diag.emit(Diagnostic::UnsupportedParameter {
                name: name.clone(),
                value: value.clone(),
            });
            continue;
        };
        let Some(field) = coerce(value, coercion) else {
            diag.emit(Diagnostic::InvalidValue {
                name: name.clone(),
                value: value.clone(),
                expected: expected_name(coercion),
            });
            continue;
        };
        match group {
            Group::Prediction => config.prediction_config.push(key, field),
            Group::Load => config.load_model_config.push(key, field),
        }
    }

    config
}
