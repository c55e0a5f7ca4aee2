use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use reqwest::Client;
use log::{error, warn};

use crate::errors::ProviderError;
use crate::providers::{is_transient, RateGate, TranslationBackend, TranslationRequest};

/// DeepL client for interacting with the DeepL REST API
#[derive(Debug)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults by key type)
    endpoint: String,
    /// Maximum number of retry attempts for transient failures
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional requests-per-minute gate
    rate_gate: Option<RateGate>,
}

/// DeepL translate request body
#[derive(Debug, Serialize)]
struct DeepLRequest {
    /// Texts to translate (we always send exactly one)
    text: Vec<String>,

    /// Source language code
    source_lang: String,

    /// Target language code
    target_lang: String,

    /// Additional context that influences the translation without being
    /// translated itself
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,

    /// Keep whitespace and sentinel formatting intact
    preserve_formatting: bool,
}

/// DeepL translate response
#[derive(Debug, Deserialize)]
struct DeepLResponse {
    /// One result per input text
    translations: Vec<DeepLTranslation>,
}

/// Individual translation in a DeepL response
#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    /// The translated text
    text: String,
}

/// DeepL usage response, used for connection testing
#[derive(Debug, Deserialize)]
struct DeepLUsage {
    character_count: u64,
    character_limit: u64,
}

impl DeepL {
    /// Create a new DeepL client
    ///
    /// An empty endpoint selects the public API host matching the key:
    /// keys with the `:fx` suffix belong to the free tier.
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        let api_key = api_key.into();
        let endpoint = {
            let endpoint = endpoint.into();
            if !endpoint.is_empty() {
                endpoint.trim_end_matches('/').to_string()
            } else if api_key.ends_with(":fx") {
                "https://api-free.deepl.com".to_string()
            } else {
                "https://api.deepl.com".to_string()
            }
        };

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key,
            endpoint,
            max_retries,
            backoff_base_ms,
            rate_gate: RateGate::from_rpm(rate_limit),
        }
    }

    async fn send(&self, request: &DeepLRequest) -> Result<String, ProviderError> {
        let api_url = format!("{}/v2/translate", self.endpoint);

        let response = self.client.post(&api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
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
            let body = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(Self::map_api_error(status.as_u16(), body, request));
        }

        let deepl_response = response.json::<DeepLResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        deepl_response.translations.into_iter()
            .next()
            .map(|translation| translation.text)
            .ok_or_else(|| ProviderError::ParseError("Empty translations array".to_string()))
    }

    /// Map a non-success status to the typed error the engine dispatches on
    fn map_api_error(status_code: u16, body: String, request: &DeepLRequest) -> ProviderError {
        match status_code {
            401 | 403 => ProviderError::AuthenticationError(body),
            429 => ProviderError::RateLimitExceeded(body),
            456 => ProviderError::QuotaExhausted(body),
            400 if body.contains("target_lang") || body.contains("not supported") => {
                ProviderError::UnsupportedLanguage {
                    source_lang: request.source_lang.clone(),
                    target: request.target_lang.clone(),
                }
            }
            _ => ProviderError::ApiError { status_code, message: body },
        }
    }
}

#[async_trait]
impl TranslationBackend for DeepL {
    async fn translate(&self, request: TranslationRequest) -> Result<String, ProviderError> {
        let body = DeepLRequest {
            text: vec![request.text],
            source_lang: request.source_language,
            target_lang: request.target_language,
            context: request.context,
            preserve_formatting: true,
        };

        let mut attempt = 0;
        loop {
            if let Some(gate) = &self.rate_gate {
                gate.wait().await;
            }

            match self.send(&body).await {
                Ok(text) => return Ok(text),
                Err(e) if is_transient(&e) && attempt < self.max_retries => {
                    let backoff = self.backoff_base_ms * (1u64 << attempt);
                    warn!("DeepL request failed ({}), retrying in {}ms", e, backoff);
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("DeepL request failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let api_url = format!("{}/v2/usage", self.endpoint);

        let response = self.client.get(&api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationError(body),
                code => ProviderError::ApiError { status_code: code, message: body },
            });
        }

        let usage = response.json::<DeepLUsage>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        if usage.character_count >= usage.character_limit {
            return Err(ProviderError::QuotaExhausted(format!(
                "{} of {} characters used",
                usage.character_count, usage.character_limit
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "deepl"
    }
}
