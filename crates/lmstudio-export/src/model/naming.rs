//! Naming helpers for exported files and preset identifiers.

/// Scheme prefix LM Studio uses for locally defined presets.
pub const PRESET_SCHEME: &str = "@local:";

/// Convert a model name (e.g. `llama3.1:8b`) into a filesystem-safe stem.
pub fn safe_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Preset identifier: `@local:` followed by the lower-cased display name with
/// spaces replaced by hyphens.
pub fn preset_identifier(display_name: &str) -> String {
    format!(
        "{}{}",
        PRESET_SCHEME,
        display_name.to_lowercase().replace(' ', "-")
    )
}

/// File name of a preset under LM Studio's `config-presets` directory.
pub fn preset_file_name(display_name: &str) -> String {
    format!("{display_name}.preset.json")
}

/// File name for a flat config export of `model`.
pub fn config_file_name(model: &str) -> String {
    let safe = safe_name(model);
    if safe.is_empty() {
        "model.json".to_string()
    } else {
        format!("{safe}.json")
    }
}
