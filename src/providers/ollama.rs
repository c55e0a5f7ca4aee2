use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use log::{error, warn};

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{is_transient, RateGate, TranslationBackend, TranslationRequest};

/// Ollama client for translating through a local LLM server
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// Model name to generate with
    model: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional requests-per-minute gate
    rate_gate: Option<RateGate>,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    system: String,
    /// Additional model parameters
    options: GenerationOptions,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationOptions {
    /// Low temperature keeps translations literal
    temperature: f32,
}

/// Generate response from the Ollama API
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    /// Generated text
    response: String,
}

/// Version response, used for connection testing
#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: String,
}

impl Ollama {
    /// Create a new Ollama client
    pub fn new_with_config(
        host: &str,
        port: u16,
        model: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}:{}", host.trim_end_matches('/'), port)
        } else {
            format!("http://{}:{}", host, port)
        };

        Self {
            base_url,
            model: model.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
            rate_gate: RateGate::from_rpm(rate_limit),
        }
    }

    /// Ollama server version, also serves as the connection probe
    pub async fn version(&self) -> Result<String, ProviderError> {
        let response = self.client.get(format!("{}/api/version", self.base_url))
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::ApiError {
                status_code: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let version = response.json::<VersionResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(version.version)
    }

    fn build_prompt(request: &TranslationRequest) -> (String, String) {
        let source_name = display_name(&request.source_language);
        let target_name = display_name(&request.target_language);

        let system = format!(
            "You are a translation engine for video game text. Translate from {} to {}. \
             Placeholders of the form [VAR_0], [VAR_1], ... must be copied into the \
             translation exactly as written. Reply with the translation only, no quotes, \
             no explanations.",
            source_name, target_name
        );

        let prompt = match &request.context {
            Some(context) => format!("Context key: {}\nText: {}", context, request.text),
            None => format!("Text: {}", request.text),
        };

        (system, prompt)
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let response = self.client.post(format!("{}/api/generate", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let generation = response.json::<GenerationResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(generation.response.trim().to_string())
    }
}

/// Human-readable name for a provider code, for use in prompts
fn display_name(provider_code: &str) -> String {
    language_utils::GAME_LANGUAGES
        .iter()
        .find(|lang| lang.provider_code.eq_ignore_ascii_case(provider_code))
        .map(|lang| lang.display_name.to_string())
        .unwrap_or_else(|| provider_code.to_string())
}

#[async_trait]
impl TranslationBackend for Ollama {
    async fn translate(&self, request: TranslationRequest) -> Result<String, ProviderError> {
        let (system, prompt) = Self::build_prompt(&request);
        let body = GenerationRequest {
            model: self.model.clone(),
            prompt,
            system,
            options: GenerationOptions { temperature: 0.3 },
            stream: false,
        };

        let mut attempt = 0;
        loop {
            if let Some(gate) = &self.rate_gate {
                gate.wait().await;
            }

            match self.generate(&body).await {
                Ok(text) => return Ok(text),
                Err(e) if is_transient(&e) && attempt < self.max_retries => {
                    let backoff = self.backoff_base_ms * (1u64 << attempt);
                    warn!("Ollama request failed ({}), retrying in {}ms", e, backoff);
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Ollama request failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.version().await.map(|_| ())
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
