/*!
 * Common test utilities for the pdxloc test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use pdxloc::language_utils::{self, GameLanguage};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small english localization file exercising every line kind
pub fn sample_source() -> String {
    concat!(
        "l_english:\n",
        " GREETING: \"Hello $PLAYER$\"\n",
        " ONLY_TAG: \"[frame]\"\n",
        " # A plain comment line\n",
        " FAREWELL: \"Goodbye, friend\"\n",
    ).to_string()
}

/// The english language table entry
pub fn english() -> &'static GameLanguage {
    language_utils::from_folder("english").unwrap()
}

/// The french language table entry
pub fn french() -> &'static GameLanguage {
    language_utils::from_folder("french").unwrap()
}

/// The german language table entry
pub fn german() -> &'static GameLanguage {
    language_utils::from_folder("german").unwrap()
}
