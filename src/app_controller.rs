use anyhow::{anyhow, Result};
use log::{error, info, warn};
use std::path::PathBuf;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::hash_store::HashStore;
use crate::loc_file::LocFile;
use crate::sync::{SyncEngine, SyncReport};
use crate::translation::TranslationService;
use crate::workshop::WorkshopSyncer;

// @module: Application controller for localization sync runs

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the localization sync workflow
    ///
    /// Walks the source-language tree, builds every target-language file,
    /// and persists the fingerprint store. `force` drops the stored
    /// fingerprints for the configured targets first, re-translating
    /// everything.
    pub async fn run_sync(&self, force: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        let source = self.config.source()?;
        let targets = self.config.targets()?;

        let loc_root = PathBuf::from(&self.config.localization_dir);
        let source_root = loc_root.join(source.folder);
        if !FileManager::dir_exists(&source_root) {
            return Err(anyhow!("Source localization directory not found: {:?}", source_root));
        }

        let files = FileManager::find_localization_files(&source_root)?;
        if files.is_empty() {
            warn!("No localization files found under {:?}", source_root);
            return Ok(());
        }

        let mut store = HashStore::load(&self.config.hash_store_path)?;
        if force {
            let mut removed = 0;
            for target in &targets {
                removed += store.clear_language(target.folder);
            }
            info!("Force mode: dropped {} stored fingerprints", removed);
        }

        let service = TranslationService::new(&self.config.translation)?;
        info!(
            "Syncing {} file(s) from {} to {} language(s) via {}",
            files.len(),
            source.folder,
            targets.len(),
            service.provider_name()
        );

        let mut engine = SyncEngine::new(service, source);
        let mut report = SyncReport::default();

        let progress = ProgressBar::new((files.len() * targets.len()) as u64);
        progress.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );

        let mut aborted = false;
        'files: for file in &files {
            let content = FileManager::read_to_string(file)?;
            let source_loc = LocFile::parse(&content);

            for target in &targets {
                let file_label = file
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                progress.set_message(format!("{} -> {}", file_label, target.folder));

                let target_path = FileManager::target_path_for(
                    file,
                    &source_root,
                    &loc_root.join(target.folder),
                    source,
                    target,
                )?;

                let existing_content = if FileManager::file_exists(&target_path) {
                    Some(FileManager::read_to_string(&target_path)?)
                } else {
                    None
                };
                let existing = existing_content.as_deref().map(LocFile::parse);

                let built = engine
                    .sync_file(&source_loc, existing.as_ref(), target, &mut store, &mut report)
                    .await;

                // Rewrite only when bytes actually change, so an idle run
                // leaves target files untouched.
                let rendered = built.render();
                if existing_content.as_deref() != Some(rendered.as_str()) {
                    FileManager::write_localization(&target_path, &rendered)?;
                }

                progress.inc(1);

                if engine.auth_failed() {
                    aborted = true;
                    break 'files;
                }
            }
        }

        progress.finish_and_clear();
        store.save()?;

        self.log_summary(&report, &engine, start_time.elapsed());

        if aborted {
            error!("Run aborted: the provider rejected our credentials; completed work was kept");
            return Err(anyhow!("authentication failed"));
        }
        Ok(())
    }

    /// Run the workshop page translation workflow
    pub async fn run_workshop(&self, force: bool) -> Result<()> {
        let mut store = HashStore::load(&self.config.hash_store_path)?;
        if force {
            let mut removed = 0;
            for target in self.config.targets()? {
                removed += if store.remove(crate::workshop::DESCRIPTION_KEY, target.folder) { 1 } else { 0 };
            }
            info!("Force mode: dropped {} workshop description fingerprints", removed);
        }

        let service = TranslationService::new(&self.config.translation)?;
        let syncer = WorkshopSyncer::new(&service, &self.config);
        let result = syncer.run(&mut store).await;

        store.save()?;
        result.map(|_| ())
    }

    fn log_summary(&self, report: &SyncReport, engine: &SyncEngine, elapsed: std::time::Duration) {
        let cache = engine.cache_stats();
        info!(
            "Sync finished in {}: {} translated, {} up to date, {} copied (tags {}, marked {}, regions {}), {} locked, {} failed",
            Self::format_duration(elapsed),
            report.translated,
            report.up_to_date,
            report.copied(),
            report.tag_only,
            report.skip_marked,
            report.region_skipped,
            report.locked,
            report.failed,
        );
        info!(
            "Backend requests: {} ({} cache hits, {} misses)",
            report.requests, cache.hits, cache.misses
        );

        for failure in &report.failures {
            warn!("Failed: {} [{}]: {}", failure.key, failure.language, failure.message);
        }
    }

    /// Format a duration as a human readable string
    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m {}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
