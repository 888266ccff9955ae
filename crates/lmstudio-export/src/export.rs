//! Export pipeline: fetch a Modelfile, parse it, map it to an LM Studio
//! document, and hand the pretty-printed JSON to a sink.
//!
//! Each export is independent; the binary runs several of them concurrently.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ExportError, Result};
use crate::lmstudio::{to_lmstudio_config, to_lmstudio_preset};
use crate::model::{ParsedModelfile, preset_file_name};
use crate::parser::parse_modelfile;
use crate::sink::ConfigSink;
use crate::source::ModelfileSource;

/// Directory under the LM Studio home that holds presets.
pub const PRESETS_DIR: &str = "config-presets";

/// Fetch and parse the Modelfile for `model`.
///
/// An empty body is not an error: it yields an empty [`ParsedModelfile`] and
/// an [`Diagnostic::EmptyModelfile`] event.
pub async fn fetch_parsed(
    source: &dyn ModelfileSource,
    model: &str,
    diag: &(dyn Diagnostics + Sync),
) -> Result<ParsedModelfile> {
    let text = source.modelfile(model).await?;
    if text.trim().is_empty() {
        diag.emit(Diagnostic::EmptyModelfile {
            model: model.to_string(),
        });
        return Ok(ParsedModelfile::default());
    }
    Ok(parse_modelfile(&text))
}

/// Serialize a document as 2-space indented JSON.
pub fn to_json_bytes<T: Serialize>(doc: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(doc)?)
}

/// `$HOME/.lmstudio`.
pub fn default_lmstudio_home() -> Result<PathBuf> {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join(".lmstudio")),
        _ => Err(ExportError::HomeDir),
    }
}

/// Path of the preset file for `display_name` under `lmstudio_home`.
pub fn preset_path(lmstudio_home: &Path, display_name: &str) -> PathBuf {
    lmstudio_home
        .join(PRESETS_DIR)
        .join(preset_file_name(display_name))
}

/// Export `model` as a flat LM Studio config written to `output`.
pub async fn export_config(
    source: &dyn ModelfileSource,
    sink: &dyn ConfigSink,
    model: &str,
    output: &Path,
    diag: &(dyn Diagnostics + Sync),
) -> Result<PathBuf> {
    let parsed = fetch_parsed(source, model, diag).await?;
    let config = to_lmstudio_config(&parsed, diag);
    sink.write(output, &to_json_bytes(&config)?)?;
    tracing::info!(
        "exported config for {} to {} (prediction fields={}, load fields={})",
        model,
        output.display(),
        config.prediction_config.fields.len(),
        config.load_model_config.fields.len()
    );
    Ok(output.to_path_buf())
}

/// Export `model` as an LM Studio preset named `display_name`.
pub async fn export_preset(
    source: &dyn ModelfileSource,
    sink: &dyn ConfigSink,
    model: &str,
    display_name: &str,
    lmstudio_home: &Path,
    diag: &(dyn Diagnostics + Sync),
) -> Result<PathBuf> {
    let parsed = fetch_parsed(source, model, diag).await?;
    let preset = to_lmstudio_preset(&parsed, display_name);
    let path = preset_path(lmstudio_home, display_name);
    sink.write(&path, &to_json_bytes(&preset)?)?;
    tracing::info!(
        "exported preset '{}' ({}) for {} to {}",
        preset.name,
        preset.identifier,
        model,
        path.display()
    );
    Ok(path)
}
