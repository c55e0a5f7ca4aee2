/*!
 * Error types for the pdxloc application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error when the provider's character/request quota is exhausted
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Error when the provider does not support the requested language pair
    #[error("Unsupported language pair: {source_lang} -> {target}")]
    UnsupportedLanguage {
        /// Source language code sent to the provider
        source_lang: String,
        /// Target language code sent to the provider
        target: String,
    },
}

impl ProviderError {
    /// Whether further calls to the provider would uniformly fail this run
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(self, Self::AuthenticationError(_))
    }
}

/// Errors that can occur while synchronizing localization files
#[derive(Error, Debug)]
pub enum SyncError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error parsing a localization file
    #[error("Malformed localization file {path}: {message}")]
    MalformedFile {
        /// Path of the offending file
        path: String,
        /// What went wrong
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from localization synchronization
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
