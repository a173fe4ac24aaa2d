//! Ollama API client for local LLM inference.

use super::stream::collect_fragments;
use crate::config::GatewayConfig;
use crate::error::{GenError, Result};
use crate::ports::ModelBackend;
use async_trait::async_trait;
use ollagen_types::{ModelInfo, OptionMap};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound on the tag listing, which also serves as the health probe
const TAGS_TIMEOUT: Duration = Duration::from_secs(10);

/// Ollama API client.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    stream: bool,
}

/// Request to Ollama generate API.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a OptionMap>,
}

/// Response from Ollama tags API (list models).
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

impl OllamaBackend {
    /// Create a streaming client for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            stream: true,
        }
    }

    /// Create a client from the gateway configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| GenError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.backend_url.clone(),
            stream: config.stream,
        })
    }

    /// Ask for a streamed (true) or single-shot (false) response.
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn unreachable(&self, reason: impl std::fmt::Display) -> GenError {
        GenError::BackendUnreachable {
            url: self.base_url.clone(),
            reason: reason.to_string(),
        }
    }

    async fn generate_once(&self, model: &str, prompt: &str, options: &OptionMap) -> Result<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: self.stream,
            options: (!options.is_empty()).then_some(options),
        };

        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Backend answered {} for model {}", status, model);
            return Err(GenError::BackendError {
                status: status.as_u16(),
                body,
            });
        }

        collect_fragments(status.as_u16(), response.bytes_stream()).await
    }
}

#[async_trait]
impl ModelBackend for OllamaBackend {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &OptionMap,
        timeout: Duration,
    ) -> Result<String> {
        info!(
            "Generating with model {} (stream={}, {} prompt bytes)",
            model,
            self.stream,
            prompt.len()
        );

        match tokio::time::timeout(timeout, self.generate_once(model, prompt, options)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Backend call for model {} timed out after {:?}", model, timeout);
                Err(self.unreachable(format!("no complete response within {:?}", timeout)))
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenError::BackendError {
                status: status.as_u16(),
                body,
            });
        }

        let tags: TagsResponse = response.json().await.map_err(|e| GenError::BackendError {
            status: status.as_u16(),
            body: format!("Unexpected tag listing: {}", e),
        })?;

        debug!("Backend reports {} models", tags.models.len());
        Ok(tags.models)
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).timeout(TAGS_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Backend health probe failed: {}", e);
                false
            }
        }
    }
}
