/*!
 * Workshop page translation sync.
 *
 * Generates per-language `title_<lang>.txt` / `description_<lang>.txt`
 * files next to the source workshop description. Descriptions regenerate
 * when the source text or the selected provider changes; titles are
 * generated at most once, so deleting the title file is the only way to
 * get a new one, and a provider change never re-triggers it.
 */

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde_json::Value;

use crate::app_config::Config;
use crate::errors::ProviderError;
use crate::file_utils::FileManager;
use crate::hash_store::{fingerprint, HashStore};
use crate::language_utils::GameLanguage;
use crate::scanner;
use crate::translation::TranslationService;

/// Store key for description records ("workshop.description|<lang>")
pub const DESCRIPTION_KEY: &str = "workshop.description";

/// Store key for title records; recorded for bookkeeping, never compared
pub const TITLE_KEY: &str = "workshop.title";

/// Counters for one workshop sync run
#[derive(Debug, Default, Clone)]
pub struct WorkshopReport {
    /// Descriptions freshly translated
    pub descriptions_translated: usize,

    /// Titles freshly translated
    pub titles_translated: usize,

    /// Files left alone (fingerprint match or title already present)
    pub up_to_date: usize,

    /// Languages the backend failed on
    pub failed: usize,
}

/// Workshop page synchronizer for one run
pub struct WorkshopSyncer<'a> {
    service: &'a TranslationService,
    config: &'a Config,
}

impl<'a> WorkshopSyncer<'a> {
    pub fn new(service: &'a TranslationService, config: &'a Config) -> Self {
        Self { service, config }
    }

    /// Sync workshop page texts for every configured target language
    pub async fn run(&self, store: &mut HashStore) -> Result<WorkshopReport> {
        let source = self.config.source()?;
        let targets = self.config.targets()?;

        let description_path = Path::new(&self.config.workshop.description_path);
        if !description_path.exists() {
            return Err(anyhow!("Workshop description file not found: {:?}", description_path));
        }
        let description = FileManager::read_to_string(description_path)?;

        let title = self.load_mod_title();
        if title.is_none() {
            warn!("No mod title available, skipping title translations");
        }

        let translations_dir = PathBuf::from(&self.config.workshop.translations_dir);
        FileManager::ensure_dir(&translations_dir)?;

        let mut report = WorkshopReport::default();

        for target in &targets {
            match self.sync_language(target, source.provider_code, &description, title.as_deref(), &translations_dir, store, &mut report).await {
                Ok(()) => {}
                Err(e) if e.is_fatal_for_run() => {
                    warn!("Authentication failed, aborting workshop sync: {}", e);
                    report.failed += 1;
                    break;
                }
                Err(e) => {
                    warn!("Workshop sync failed for {}: {}", target.folder, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Workshop sync done: {} descriptions, {} titles translated, {} up to date, {} failed",
            report.descriptions_translated, report.titles_translated, report.up_to_date, report.failed
        );
        Ok(report)
    }

    async fn sync_language(
        &self,
        target: &GameLanguage,
        source_code: &str,
        description: &str,
        title: Option<&str>,
        translations_dir: &Path,
        store: &mut HashStore,
        report: &mut WorkshopReport,
    ) -> Result<(), ProviderError> {
        // Description: fingerprint covers provider + source text, so either
        // changing regenerates the file.
        let description_file = translations_dir.join(format!("description_{}.txt", target.folder));
        let description_fingerprint = fingerprint(&format!("{}\n{}", self.service.provider_name(), description));
        let stored = store.get(DESCRIPTION_KEY, target.folder);

        if description_file.exists() && stored == Some(description_fingerprint.as_str()) {
            report.up_to_date += 1;
        } else {
            let translated = self.translate_masked(description, source_code, target).await?;
            FileManager::write_atomic(&description_file, &translated)
                .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
            store.put(DESCRIPTION_KEY, target.folder, &description_fingerprint);
            report.descriptions_translated += 1;
            info!("Wrote {:?}", description_file);
        }

        // Title: presence of the file is the only guard. Generated once,
        // never refreshed by source or provider changes.
        if let Some(title) = title {
            let title_file = translations_dir.join(format!("title_{}.txt", target.folder));
            if title_file.exists() {
                report.up_to_date += 1;
            } else {
                let translated = self.translate_masked(title, source_code, target).await?;
                FileManager::write_atomic(&title_file, &translated)
                    .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
                store.put(TITLE_KEY, target.folder, &fingerprint(title));
                report.titles_translated += 1;
                info!("Wrote {:?}", title_file);
            }
        }

        Ok(())
    }

    async fn translate_masked(
        &self,
        text: &str,
        source_code: &str,
        target: &GameLanguage,
    ) -> Result<String, ProviderError> {
        let masked = scanner::mask(text);
        let raw = self
            .service
            .translate(&masked.text, source_code, target.provider_code, None)
            .await?;

        let missing = scanner::missing_tokens(&raw, &masked.tokens);
        if !missing.is_empty() {
            warn!("Workshop text for {}: backend dropped {} tokens", target.folder, missing.len());
        }
        Ok(scanner::unmask(&raw, &masked.tokens))
    }

    /// Mod title from metadata.json, with a trailing " Dev" suffix stripped
    fn load_mod_title(&self) -> Option<String> {
        let path = Path::new(&self.config.metadata_path);
        if !path.exists() {
            warn!("Metadata file not found: {:?}", path);
            return None;
        }

        let metadata: Value = FileManager::read_to_string(path)
            .and_then(|content| {
                serde_json::from_str(&content).context("metadata.json is not valid JSON")
            })
            .map_err(|e| warn!("Failed to read metadata file {:?}: {}", path, e))
            .ok()?;

        let name = metadata.get("name").and_then(Value::as_str)?;
        let name = name.strip_suffix(" Dev").unwrap_or(name);
        let name = name.trim();
        if name.is_empty() { None } else { Some(name.to_string()) }
    }
}
