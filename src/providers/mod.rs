/*!
 * Provider implementations for translation services.
 *
 * This module contains client implementations for the supported backends:
 * - DeepL: machine-translation REST API
 * - Ollama: local LLM server
 * - Mock: configurable fake for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::{Duration, Instant};
use parking_lot::Mutex;

use crate::errors::ProviderError;

/// One translation request handed to a backend
///
/// The text arrives with game tokens already masked; language codes are the
/// provider codes from the language table (`FR`, `PT-BR`), not folder names.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// Masked text to translate
    pub text: String,

    /// Source language provider code
    pub source_language: String,

    /// Target language provider code
    pub target_language: String,

    /// Optional context hint (the entry key) some providers accept
    pub context: Option<String>,
}

/// Common trait for all translation backends
///
/// This trait defines the interface every provider implementation must
/// follow, allowing the sync engine to treat them interchangeably. Failures
/// are typed so the engine can tell retryable errors from run-fatal ones.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Translate one piece of text
    async fn translate(&self, request: TranslationRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short provider identifier, used in logs and fingerprints
    fn name(&self) -> &'static str;
}

/// Requests-per-minute gate shared by the HTTP clients
///
/// Serializes call pacing without blocking the runtime: the lock is only
/// held to compute the wait, the sleep happens outside it.
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateGate {
    /// Gate for a requests-per-minute budget; `None` disables pacing
    pub fn from_rpm(rpm: Option<u32>) -> Option<Self> {
        rpm.filter(|rpm| *rpm > 0).map(|rpm| Self {
            min_interval: Duration::from_secs_f64(60.0 / f64::from(rpm)),
            last_request: Mutex::new(None),
        })
    }

    /// Wait until the next request is allowed
    pub async fn wait(&self) {
        let delay = {
            let mut last = self.last_request.lock();
            let now = Instant::now();
            match *last {
                Some(previous) => {
                    let elapsed = now.duration_since(previous);
                    if elapsed < self.min_interval {
                        let delay = self.min_interval - elapsed;
                        *last = Some(now + delay);
                        delay
                    } else {
                        *last = Some(now);
                        Duration::ZERO
                    }
                }
                None => {
                    *last = Some(now);
                    Duration::ZERO
                }
            }
        };

        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Whether an error is worth retrying with backoff
pub(crate) fn is_transient(error: &ProviderError) -> bool {
    match error {
        ProviderError::ConnectionError(_) | ProviderError::RequestFailed(_) => true,
        ProviderError::RateLimitExceeded(_) => true,
        ProviderError::ApiError { status_code, .. } => *status_code >= 500,
        _ => false,
    }
}

pub mod deepl;
pub mod ollama;
pub mod mock;
