/*!
 * Incremental localization synchronization.
 *
 * The engine makes one deterministic pass over a source file per target
 * language, deciding per entry whether to translate, copy verbatim, or
 * leave the existing target line alone. Change detection is fingerprint
 * based; a backend failure never loses work already done in the run.
 */

use std::collections::HashSet;

use log::{debug, warn};

use crate::errors::ProviderError;
use crate::hash_store::{fingerprint, HashStore};
use crate::language_utils::GameLanguage;
use crate::loc_file::{LocEntry, LocFile, LocLine};
use crate::scanner::{self, LineClass, RegionState};
use crate::translation::{CacheStats, TranslationService};

/// One entry/language pair the backend could not serve this run
#[derive(Debug, Clone)]
pub struct SyncFailure {
    /// Entry key
    pub key: String,

    /// Target language folder
    pub language: String,

    /// Provider error text
    pub message: String,
}

/// Counters accumulated over a run, logged in the end-of-run summary
#[derive(Debug, Default, Clone)]
pub struct SyncReport {
    /// Entries freshly translated
    pub translated: usize,

    /// Entries left untouched because their fingerprint matched
    pub up_to_date: usize,

    /// Entries copied verbatim: nothing translatable in them
    pub tag_only: usize,

    /// Entries copied verbatim: single-line skip directive
    pub skip_marked: usize,

    /// Entries copied verbatim: inside a no-translate region
    pub region_skipped: usize,

    /// Target lines left untouched because they carry the lock directive
    pub locked: usize,

    /// Entries the backend failed on (retried next run)
    pub failed: usize,

    /// Translation service requests issued (cache hits included)
    pub requests: usize,

    /// Failure details
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// Total entries copied verbatim without a backend call
    pub fn copied(&self) -> usize {
        self.tag_only + self.skip_marked + self.region_skipped
    }
}

/// Sync engine driving one run
///
/// Holds the run-scoped failure state: once the backend reports an
/// authentication failure no further calls are made at all, and an
/// unsupported-language failure disables calls for that language only.
pub struct SyncEngine {
    service: TranslationService,
    source: &'static GameLanguage,
    auth_failed: bool,
    disabled_targets: HashSet<String>,
}

impl SyncEngine {
    /// Create an engine for one run
    pub fn new(service: TranslationService, source: &'static GameLanguage) -> Self {
        Self {
            service,
            source,
            auth_failed: false,
            disabled_targets: HashSet::new(),
        }
    }

    /// Whether the backend rejected our credentials this run
    pub fn auth_failed(&self) -> bool {
        self.auth_failed
    }

    /// Cache counters from the underlying service
    pub fn cache_stats(&self) -> CacheStats {
        self.service.cache_stats()
    }

    /// Build the target-language version of one source file
    ///
    /// Structure and ordering come from the source file; values come from
    /// the per-entry decision; trailing comments come from the existing
    /// target line when present, so lock markers survive. The call itself
    /// never fails: per-entry backend failures are recorded in the report
    /// and the prior line (or the source text) is carried instead.
    pub async fn sync_file(
        &mut self,
        source_file: &LocFile,
        existing_target: Option<&LocFile>,
        target: &GameLanguage,
        store: &mut HashStore,
        report: &mut SyncReport,
    ) -> LocFile {
        let existing_entries = existing_target
            .map(|file| file.entry_map())
            .unwrap_or_default();

        let mut region = RegionState::new();
        let mut output = LocFile::default();

        for line in &source_file.lines {
            match line {
                LocLine::Header { indent, id } if *id == self.source.id => {
                    output.lines.push(LocLine::Header {
                        indent: indent.clone(),
                        id: target.id.to_string(),
                    });
                }
                LocLine::Header { .. } => {
                    output.lines.push(line.clone());
                }
                LocLine::Raw(raw) => {
                    region.observe(raw);
                    output.lines.push(line.clone());
                }
                LocLine::Entry(entry) => {
                    // Region markers may ride on entry lines; update state
                    // before classifying so the marker line itself is copied.
                    region.observe(&entry.to_string());

                    let built = self
                        .sync_entry(entry, existing_entries.get(entry.key_trimmed()).copied(), target, &region, store, report)
                        .await;
                    output.lines.push(LocLine::Entry(built));
                }
            }
        }

        output
    }

    async fn sync_entry(
        &mut self,
        entry: &LocEntry,
        existing: Option<&LocEntry>,
        target: &GameLanguage,
        region: &RegionState,
        store: &mut HashStore,
        report: &mut SyncReport,
    ) -> LocEntry {
        let key = entry.key_trimmed().to_string();

        // A locked target line wins over everything, including source edits.
        if let Some(prior) = existing {
            if scanner::is_locked(&prior.comment) {
                report.locked += 1;
                debug!("{} [{}]: locked, leaving target untouched", key, target.folder);
                return LocEntry {
                    indent: entry.indent.clone(),
                    key: entry.key.clone(),
                    value: prior.value.clone(),
                    comment: prior.comment.clone(),
                };
            }
        }

        let source_fingerprint = fingerprint(&entry.value);
        let comment = merge_comment(entry, existing);

        let value = match scanner::classify(&entry.value, &entry.comment, region) {
            LineClass::TagOnly => {
                report.tag_only += 1;
                store.put(&key, target.folder, &source_fingerprint);
                entry.value.clone()
            }
            LineClass::SkipMarked => {
                report.skip_marked += 1;
                store.put(&key, target.folder, &source_fingerprint);
                entry.value.clone()
            }
            LineClass::RegionSkip => {
                report.region_skipped += 1;
                store.put(&key, target.folder, &source_fingerprint);
                entry.value.clone()
            }
            LineClass::Translatable => {
                let unchanged = store.get(&key, target.folder) == Some(source_fingerprint.as_str());
                if unchanged && existing.is_some() {
                    report.up_to_date += 1;
                    existing.map(|prior| prior.value.clone()).unwrap_or_default()
                } else {
                    self.translate_entry(entry, existing, &key, target, &source_fingerprint, store, report)
                        .await
                }
            }
        };

        LocEntry {
            indent: entry.indent.clone(),
            key: entry.key.clone(),
            value,
            comment,
        }
    }

    async fn translate_entry(
        &mut self,
        entry: &LocEntry,
        existing: Option<&LocEntry>,
        key: &str,
        target: &GameLanguage,
        source_fingerprint: &str,
        store: &mut HashStore,
        report: &mut SyncReport,
    ) -> String {
        let fallback = || {
            existing
                .map(|prior| prior.value.clone())
                .unwrap_or_else(|| entry.value.clone())
        };

        if self.auth_failed {
            report.failed += 1;
            report.failures.push(SyncFailure {
                key: key.to_string(),
                language: target.folder.to_string(),
                message: "skipped: authentication failed earlier in this run".to_string(),
            });
            return fallback();
        }
        if self.disabled_targets.contains(target.folder) {
            report.failed += 1;
            report.failures.push(SyncFailure {
                key: key.to_string(),
                language: target.folder.to_string(),
                message: "skipped: language rejected by provider earlier in this run".to_string(),
            });
            return fallback();
        }

        let masked = scanner::mask(&entry.value);
        report.requests += 1;

        let result = self
            .service
            .translate(
                &masked.text,
                self.source.provider_code,
                target.provider_code,
                Some(key.to_string()),
            )
            .await;

        match result {
            Ok(raw) => {
                let missing = scanner::missing_tokens(&raw, &masked.tokens);
                if !missing.is_empty() {
                    let dropped: Vec<&str> = missing.iter().map(|i| masked.tokens[*i].as_str()).collect();
                    warn!(
                        "{} [{}]: backend dropped tokens {:?}",
                        key, target.folder, dropped
                    );
                }

                let restored = scanner::unmask(&raw, &masked.tokens);
                let cleaned = scanner::cleanup(&restored);
                store.put(key, target.folder, source_fingerprint);
                report.translated += 1;
                cleaned
            }
            Err(e) => {
                warn!("{} [{}]: translation failed: {}", key, target.folder, e);
                report.failed += 1;
                report.failures.push(SyncFailure {
                    key: key.to_string(),
                    language: target.folder.to_string(),
                    message: e.to_string(),
                });

                match &e {
                    ProviderError::AuthenticationError(_) => {
                        self.auth_failed = true;
                    }
                    ProviderError::UnsupportedLanguage { .. } => {
                        self.disabled_targets.insert(target.folder.to_string());
                    }
                    _ => {}
                }

                // No fingerprint update: the entry stays eligible for retry.
                fallback()
            }
        }
    }
}

/// Trailing comment for a built entry: the existing target line's comment
/// wins when present (it carries lock markers), else the source comment
fn merge_comment(entry: &LocEntry, existing: Option<&LocEntry>) -> String {
    match existing {
        Some(prior) if !prior.comment.trim().is_empty() => prior.comment.clone(),
        _ => entry.comment.clone(),
    }
}
