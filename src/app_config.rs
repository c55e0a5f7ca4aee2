use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language folder name (e.g. "english")
    pub source_language: String,

    /// Target language folder names, processed in this order
    pub target_languages: Vec<String>,

    /// Root directory holding the per-language localization folders
    #[serde(default = "default_localization_dir")]
    pub localization_dir: String,

    /// Path of the fingerprint store file
    #[serde(default = "default_hash_store_path")]
    pub hash_store_path: String,

    /// Path of the mod metadata file (workshop title source)
    #[serde(default = "default_metadata_path")]
    pub metadata_path: String,

    /// Workshop page translation settings
    #[serde(default)]
    pub workshop: WorkshopConfig,

    /// Translation config
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Workshop page translation paths
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkshopConfig {
    /// Source workshop description file
    #[serde(default = "default_workshop_description_path")]
    pub description_path: String,

    /// Directory receiving title_<lang>.txt / description_<lang>.txt files
    #[serde(default = "default_workshop_translations_dir")]
    pub translations_dir: String,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            description_path: default_workshop_description_path(),
            translations_dir: default_workshop_translations_dir(),
        }
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: DeepL
    #[default]
    DeepL,
    // @provider: Ollama (local LLM)
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::DeepL => "DeepL",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::DeepL => "deepl".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deepl" => Ok(Self::DeepL),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name (LLM providers only)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::DeepL => Self {
                provider_type: "deepl".to_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: String::new(),
                timeout_secs: default_timeout_secs(),
                rate_limit: default_deepl_rate_limit(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_ollama_timeout_secs(),
                rate_limit: None,
            },
        }
    }
}

/// Settings shared by every provider client
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CommonConfig {
    // @field: Retry attempts for transient failures
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    // @field: Base backoff in milliseconds between retries
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Translation configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Active provider
    pub provider: TranslationProvider,

    /// Per-provider settings
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// Settings shared by all providers
    #[serde(default)]
    pub common: CommonConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: default_available_providers(),
            common: CommonConfig::default(),
        }
    }
}

impl TranslationConfig {
    /// Settings of the active provider, if configured
    pub fn get_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_type = self.provider.to_lowercase_string();
        self.available_providers.iter().find(|p| p.provider_type == provider_type)
    }

    /// API key of the active provider (empty string when unset)
    pub fn get_api_key(&self) -> String {
        self.get_provider_config().map(|p| p.api_key.clone()).unwrap_or_default()
    }

    /// Endpoint of the active provider (empty string selects the default)
    pub fn get_endpoint(&self) -> String {
        self.get_provider_config().map(|p| p.endpoint.clone()).unwrap_or_default()
    }

    /// Model of the active provider (LLM providers only)
    pub fn get_model(&self) -> String {
        self.get_provider_config().map(|p| p.model.clone()).unwrap_or_default()
    }

    /// Request timeout of the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_provider_config().map(|p| p.timeout_secs).unwrap_or_else(default_timeout_secs)
    }

    /// Rate limit of the active provider
    pub fn get_rate_limit(&self) -> Option<u32> {
        self.get_provider_config().and_then(|p| p.rate_limit)
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: "english".to_string(),
            target_languages: language_utils::GAME_LANGUAGES
                .iter()
                .map(|lang| lang.folder.to_string())
                .filter(|folder| folder != "english")
                .collect(),
            localization_dir: default_localization_dir(),
            hash_store_path: default_hash_store_path(),
            metadata_path: default_metadata_path(),
            workshop: WorkshopConfig::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow!("Failed to open config file {:?}: {}", path.as_ref(), e))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path.as_ref(), e))?;
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e))?;
        Ok(())
    }

    /// Validate the merged configuration
    pub fn validate(&self) -> Result<()> {
        language_utils::from_folder(&self.source_language)?;

        if self.target_languages.is_empty() {
            return Err(anyhow!("target_languages must not be empty"));
        }
        for target in &self.target_languages {
            language_utils::from_folder(target)?;
            if target.eq_ignore_ascii_case(&self.source_language) {
                return Err(anyhow!("target_languages must not contain the source language '{}'", target));
            }
        }

        if self.localization_dir.trim().is_empty() {
            return Err(anyhow!("localization_dir must not be empty"));
        }
        if self.hash_store_path.trim().is_empty() {
            return Err(anyhow!("hash_store_path must not be empty"));
        }

        let provider_config = self.translation.get_provider_config()
            .ok_or_else(|| anyhow!(
                "No provider config for '{}' in available_providers",
                self.translation.provider
            ))?;

        match self.translation.provider {
            TranslationProvider::DeepL => {
                if provider_config.api_key.trim().is_empty() {
                    return Err(anyhow!("DeepL requires an api_key"));
                }
            }
            TranslationProvider::Ollama => {
                if provider_config.endpoint.trim().is_empty() {
                    return Err(anyhow!("Ollama requires an endpoint"));
                }
                if provider_config.model.trim().is_empty() {
                    return Err(anyhow!("Ollama requires a model"));
                }
            }
        }

        Ok(())
    }

    /// Resolved source language table entry
    pub fn source(&self) -> Result<&'static language_utils::GameLanguage> {
        language_utils::from_folder(&self.source_language)
    }

    /// Resolved target language table entries, in configured order
    pub fn targets(&self) -> Result<Vec<&'static language_utils::GameLanguage>> {
        self.target_languages.iter()
            .map(|folder| language_utils::from_folder(folder))
            .collect()
    }
}

fn default_localization_dir() -> String {
    "main_menu/localization".to_string()
}

fn default_hash_store_path() -> String {
    ".metadata/translation-hashes.json".to_string()
}

fn default_metadata_path() -> String {
    ".metadata/metadata.json".to_string()
}

fn default_workshop_description_path() -> String {
    "assets/workshop/workshop-description.txt".to_string()
}

fn default_workshop_translations_dir() -> String {
    "assets/workshop/translations".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_ollama_timeout_secs() -> u64 {
    120
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_deepl_rate_limit() -> Option<u32> {
    Some(60)
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(TranslationProvider::DeepL),
        ProviderConfig::new(TranslationProvider::Ollama),
    ]
}
