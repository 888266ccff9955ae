//! Go template to Jinja rewriting for prompt templates.
//!
//! Only the variables `.System`, `.Prompt`, `.Response` and the
//! `{{ if .X }}...{{ end }}` conditional are understood. Anything else is
//! passed through untouched.

use once_cell::sync::Lazy;
use regex::Regex;

/// Rewrite rules, applied in order. Conditionals come first so that the bare
/// variable rules never see `{{ if .System }}`.
static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\{\{\s*if\s+\.System\s*\}\}", "{% if system_message %}"),
        (r"\{\{\s*if\s+\.Prompt\s*\}\}", "{% if user_message %}"),
        (r"\{\{\s*end\s*\}\}", "{% endif %}"),
        (r"\{\{\s*\.System\s*\}\}", "{{ system_message }}"),
        (r"\{\{\s*\.Prompt\s*\}\}", "{{ user_message }}"),
        (r"\{\{\s*\.Response\s*\}\}", "{{ model_response }}"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
        Ok(re) => Some((re, replacement)),
        Err(e) => {
            tracing::error!("invalid template rule {}: {}", pattern, e);
            None
        }
    })
    .collect()
});

/// Convert an Ollama (Go template) prompt template into LM Studio Jinja.
pub fn go_template_to_jinja(template: &str) -> String {
    let mut out = template.to_string();
    for (re, replacement) in RULES.iter() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out
}
