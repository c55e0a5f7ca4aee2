/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which selects and
 * configures the backend client named by the configuration and layers the
 * in-run cache over it.
 */

use anyhow::{Result, anyhow};
use url::Url;
use log::debug;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::providers::deepl::DeepL;
use crate::providers::ollama::Ollama;
use crate::providers::{TranslationBackend, TranslationRequest};
use super::cache::{CacheStats, TranslationCache};

/// Parse an endpoint string into host and port
fn parse_endpoint(endpoint: &str) -> Result<(String, u16)> {
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    let host = url.host_str()
        .ok_or_else(|| anyhow!("Invalid host in endpoint: {}", endpoint))?
        .to_string();

    let port = url.port().unwrap_or(if url.scheme() == "https" { 443 } else { 80 });

    Ok((host, port))
}

/// Translation service used by the sync engine
///
/// Owns the configured backend and the in-run memoization cache. All
/// failures surface as [`ProviderError`] so callers can tell retryable
/// entries from run-fatal conditions.
pub struct TranslationService {
    /// Backend implementation
    backend: Box<dyn TranslationBackend>,

    /// Translation cache for the current run
    cache: TranslationCache,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let backend: Box<dyn TranslationBackend> = match config.provider {
            ConfigTranslationProvider::DeepL => {
                Box::new(DeepL::new_with_config(
                    config.get_api_key(),
                    config.get_endpoint(),
                    config.get_timeout_secs(),
                    config.common.retry_count,
                    config.common.retry_backoff_ms,
                    config.get_rate_limit(),
                ))
            }
            ConfigTranslationProvider::Ollama => {
                let (host, port) = parse_endpoint(&config.get_endpoint())?;
                Box::new(Ollama::new_with_config(
                    &host,
                    port,
                    config.get_model(),
                    config.get_timeout_secs(),
                    config.common.retry_count,
                    config.common.retry_backoff_ms,
                    config.get_rate_limit(),
                ))
            }
        };

        Ok(Self {
            backend,
            cache: TranslationCache::new(),
        })
    }

    /// Create a service around an explicit backend (used by tests)
    pub fn with_backend(backend: Box<dyn TranslationBackend>) -> Self {
        Self {
            backend,
            cache: TranslationCache::new(),
        }
    }

    /// Short identifier of the active provider
    pub fn provider_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Test the connection to the configured provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.backend.test_connection().await
    }

    /// Translate one piece of masked text, consulting the cache first
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        context: Option<String>,
    ) -> Result<String, ProviderError> {
        if let Some(cached) = self.cache.get(text, source_language, target_language) {
            return Ok(cached);
        }

        let request = TranslationRequest {
            text: text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            context,
        };

        debug!("Backend call ({} -> {}): {} chars", source_language, target_language, text.len());
        let translated = self.backend.translate(request).await?;
        self.cache.store(text, source_language, target_language, &translated);
        Ok(translated)
    }

    /// Cache counters for the run summary
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
