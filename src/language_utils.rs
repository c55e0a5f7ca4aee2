use anyhow::{Result, anyhow};

/// Language utilities for Paradox-style localization folders
///
/// This module provides the table of game languages the tool knows about
/// and functions for mapping between the folder name (`french`), the
/// localization header id (`l_french`), the code a translation provider
/// expects (`FR`), and a human-readable display name.
/// Metadata for one supported game language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameLanguage {
    /// Localization folder name, e.g. "braz_por"
    pub folder: &'static str,

    /// Header id used inside localization files, e.g. "l_braz_por"
    pub id: &'static str,

    /// Code understood by translation providers, e.g. "PT-BR"
    pub provider_code: &'static str,

    /// English display name, used when prompting LLM-style providers
    pub display_name: &'static str,
}

/// All game languages the tool can read or produce
pub const GAME_LANGUAGES: &[GameLanguage] = &[
    GameLanguage { folder: "english", id: "l_english", provider_code: "EN", display_name: "English" },
    GameLanguage { folder: "braz_por", id: "l_braz_por", provider_code: "PT-BR", display_name: "Brazilian Portuguese" },
    GameLanguage { folder: "french", id: "l_french", provider_code: "FR", display_name: "French" },
    GameLanguage { folder: "german", id: "l_german", provider_code: "DE", display_name: "German" },
    GameLanguage { folder: "japanese", id: "l_japanese", provider_code: "JA", display_name: "Japanese" },
    GameLanguage { folder: "korean", id: "l_korean", provider_code: "KO", display_name: "Korean" },
    GameLanguage { folder: "polish", id: "l_polish", provider_code: "PL", display_name: "Polish" },
    GameLanguage { folder: "russian", id: "l_russian", provider_code: "RU", display_name: "Russian" },
    GameLanguage { folder: "simp_chinese", id: "l_simp_chinese", provider_code: "ZH", display_name: "Simplified Chinese" },
    GameLanguage { folder: "spanish", id: "l_spanish", provider_code: "ES", display_name: "Spanish" },
    GameLanguage { folder: "turkish", id: "l_turkish", provider_code: "TR", display_name: "Turkish" },
];

/// Look up a language by its folder name
pub fn from_folder(folder: &str) -> Result<&'static GameLanguage> {
    let normalized = folder.trim().to_lowercase();
    GAME_LANGUAGES
        .iter()
        .find(|lang| lang.folder == normalized)
        .ok_or_else(|| anyhow!(
            "Unsupported language '{}'. Supported: {}",
            folder,
            supported_folders().join(", ")
        ))
}

/// Look up a language by its header id (e.g. "l_french")
pub fn from_id(id: &str) -> Option<&'static GameLanguage> {
    let normalized = id.trim().to_lowercase();
    GAME_LANGUAGES.iter().find(|lang| lang.id == normalized)
}

/// Check whether a folder name denotes a supported language
pub fn is_supported(folder: &str) -> bool {
    from_folder(folder).is_ok()
}

/// Sorted list of supported folder names, for error messages
pub fn supported_folders() -> Vec<&'static str> {
    GAME_LANGUAGES.iter().map(|lang| lang.folder).collect()
}

/// Rewrite the language id segment of a localization filename
///
/// Paradox localization files carry the language id in the filename
/// (`events_l_english.yml`). The target file keeps everything else intact.
/// Filenames without the source id segment are returned unchanged.
pub fn rewrite_filename(filename: &str, source: &GameLanguage, target: &GameLanguage) -> String {
    if filename.contains(source.id) {
        filename.replace(source.id, target.id)
    } else {
        filename.to_string()
    }
}
