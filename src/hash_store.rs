/*!
 * Persistent source-text fingerprints for incremental translation.
 *
 * The store maps "key|language" to the SHA-256 of the source value that
 * produced the current translation for that language. It is read at the
 * start of a run to decide work and saved atomically at the end; deleting
 * records (the `--force` flag) is the explicit re-translate mechanism.
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use anyhow::Result;
use log::{debug, warn};
use sha2::{Digest, Sha256};

use crate::file_utils::FileManager;

/// SHA-256 fingerprint of a text value, lowercase hex
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// On-disk fingerprint store
///
/// A BTreeMap keeps the serialized form stable across runs, so an unchanged
/// store serializes to unchanged bytes.
#[derive(Debug)]
pub struct HashStore {
    /// Backing file path
    path: PathBuf,

    /// "key|language" -> fingerprint
    records: BTreeMap<String, String>,

    /// Whether records changed since load
    dirty: bool,
}

impl HashStore {
    /// Load the store; a missing file yields an empty store, a malformed
    /// file is recovered as empty with a warning
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            debug!("Hash store not found at {:?}, starting empty", path);
            return Ok(Self { path, records: BTreeMap::new(), dirty: false });
        }

        let content = FileManager::read_to_string(&path)?;
        let records = match serde_json::from_str::<BTreeMap<String, String>>(&content) {
            Ok(records) => records,
            Err(e) => {
                warn!("Hash store at {:?} is malformed ({}), treating as empty", path, e);
                BTreeMap::new()
            }
        };

        Ok(Self { path, records, dirty: false })
    }

    /// In-memory store for tests
    pub fn in_memory<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            records: BTreeMap::new(),
            dirty: false,
        }
    }

    /// Stored fingerprint for an entry key and target language
    pub fn get(&self, key: &str, language: &str) -> Option<&str> {
        self.records.get(&record_key(key, language)).map(String::as_str)
    }

    /// Record the fingerprint for an entry key and target language
    pub fn put(&mut self, key: &str, language: &str, fingerprint: &str) {
        let previous = self.records.insert(record_key(key, language), fingerprint.to_string());
        if previous.as_deref() != Some(fingerprint) {
            self.dirty = true;
        }
    }

    /// Remove one record; returns whether it existed
    pub fn remove(&mut self, key: &str, language: &str) -> bool {
        let removed = self.records.remove(&record_key(key, language)).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Drop every record for a target language; returns how many were removed
    pub fn clear_language(&mut self, language: &str) -> usize {
        let suffix = format!("|{}", language);
        let before = self.records.len();
        self.records.retain(|key, _| !key.ends_with(&suffix));
        let removed = before - self.records.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether records changed since load
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist the store atomically (write to temp file, then rename)
    ///
    /// A no-op when nothing changed, so an idle run leaves the file's bytes
    /// and mtime alone.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.records)?;
        FileManager::write_atomic(&self.path, &json)?;
        self.dirty = false;
        debug!("Saved {} hash records to {:?}", self.records.len(), self.path);
        Ok(())
    }
}

fn record_key(key: &str, language: &str) -> String {
    format!("{}|{}", key, language)
}
