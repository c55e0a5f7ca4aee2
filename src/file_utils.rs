use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use std::io::Write;
use tempfile::NamedTempFile;

// @module: File and directory utilities

/// UTF-8 byte order mark the game expects at the start of localization files
pub const UTF8_BOM: &str = "\u{feff}";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string, stripping a leading UTF-8 BOM if present
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))?;
        match content.strip_prefix(UTF8_BOM) {
            Some(stripped) => Ok(stripped.to_string()),
            None => Ok(content),
        }
    }

    /// Write a string to a file atomically via a temp file in the same directory
    ///
    /// The rename guarantees readers never observe a half-written file.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = path.parent().unwrap_or(Path::new("."));
        Self::ensure_dir(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {:?}", parent))?;
        tmp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temp file for {:?}", path))?;
        tmp.persist(path)
            .with_context(|| format!("Failed to replace file: {:?}", path))?;
        Ok(())
    }

    /// Write a localization file: UTF-8 with BOM, atomic replace
    pub fn write_localization<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let mut bom_content = String::with_capacity(content.len() + UTF8_BOM.len());
        bom_content.push_str(UTF8_BOM);
        bom_content.push_str(content);
        Self::write_atomic(path, &bom_content)
    }

    /// Find localization files (.yml) under a directory, sorted for determinism
    pub fn find_localization_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case("yml") {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Compute the target-language path for a source localization file
    ///
    /// The source folder segment is replaced by the target folder, and the
    /// language id segment of the filename is rewritten. The relative layout
    /// below the language folder is preserved.
    pub fn target_path_for(
        source_file: &Path,
        source_root: &Path,
        target_root: &Path,
        source: &crate::language_utils::GameLanguage,
        target: &crate::language_utils::GameLanguage,
    ) -> Result<PathBuf> {
        let relative = source_file.strip_prefix(source_root)
            .with_context(|| format!("{:?} is not under {:?}", source_file, source_root))?;

        let mut target_path = target_root.to_path_buf();
        if let Some(parent) = relative.parent() {
            target_path.push(parent);
        }

        let filename = relative.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        target_path.push(crate::language_utils::rewrite_filename(&filename, source, target));

        Ok(target_path)
    }
}
