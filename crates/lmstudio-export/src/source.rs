//! Modelfile sources: a running Ollama server or a file on disk.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ExportError, Result};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_PORT: u16 = 11434;

/// Provides the Modelfile text for a model name.
#[async_trait]
pub trait ModelfileSource: Send + Sync {
    async fn modelfile(&self, model: &str) -> Result<String>;
}

/// Subset of Ollama's `/api/show` response that the exporter reads.
#[derive(Debug, Deserialize)]
struct ShowResponse {
    #[serde(default)]
    modelfile: Option<String>,
}

/// HTTP client for a running Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(host: &str) -> Self {
        Self {
            base_url: normalize_host(host),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Normalize `OLLAMA_HOST`-style values (`0.0.0.0`, `host:port`, full URL).
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return DEFAULT_OLLAMA_HOST.to_string();
    }
    let with_scheme = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    };
    let Some((scheme, rest)) = with_scheme.split_once("://") else {
        return with_scheme;
    };
    // The port belongs after the authority, never after a path.
    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    let has_port = authority
        .rsplit_once(':')
        .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
    if has_port {
        with_scheme
    } else {
        format!("{scheme}://{authority}:{DEFAULT_OLLAMA_PORT}{path}")
    }
}

#[async_trait]
impl ModelfileSource for OllamaClient {
    async fn modelfile(&self, model: &str) -> Result<String> {
        let url = format!("{}/api/show", self.base_url);
        tracing::debug!("fetching modelfile for {} from {}", model, url);
        let fetch_err = |e: reqwest::Error| ExportError::Fetch {
            model: model.to_string(),
            message: e.to_string(),
        };
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "name": model }))
            .send()
            .await
            .map_err(fetch_err)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ExportError::ModelNotFound {
                model: model.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ExportError::Fetch {
                model: model.to_string(),
                message: format!("server returned {status}"),
            });
        }

        let show: ShowResponse = response.json().await.map_err(fetch_err)?;
        Ok(show.modelfile.unwrap_or_default())
    }
}

/// Reads a Modelfile from disk regardless of the requested model name.
#[derive(Debug, Clone)]
pub struct LocalModelfile {
    pub path: PathBuf,
}

#[async_trait]
impl ModelfileSource for LocalModelfile {
    async fn modelfile(&self, model: &str) -> Result<String> {
        tracing::debug!("reading modelfile for {} from {}", model, self.path.display());
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ExportError::Fetch {
                model: model.to_string(),
                message: format!("{}: {}", self.path.display(), e),
            })
    }
}
