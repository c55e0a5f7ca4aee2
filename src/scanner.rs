/*!
 * Tag-aware line scanning for localization entries.
 *
 * This module classifies entry values into a closed set of variants and
 * masks inline game tokens behind stable sentinels so a translation
 * backend never sees or mutates them. The recognized token families are
 * bracketed tokens (`[Root.GetName]`), dollar-delimited variables
 * (`$PLAYER$`), at-references (`@icon!`) and hash color/format codes
 * (`#bold` / `#!`).
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker opening a no-translate region
pub const REGION_START_MARKER: &str = "# NO_TRANSLATE BELOW";

/// Marker closing a no-translate region
pub const REGION_END_MARKER: &str = "# NO_TRANSLATE END";

/// Single-line skip directive (checked after the region markers, which
/// contain it as a substring)
pub const SKIP_MARKER: &str = "# NO_TRANSLATE";

/// Per-target-line lock directive; a target entry carrying it in its
/// trailing comment is never regenerated
pub const LOCK_MARKER: &str = "# LOCK";

/// Token families masked before a backend call, applied in order so that
/// sentinels produced by the bracket pass are not re-masked by later passes
static BRACKET_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").unwrap());
static DOLLAR_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$.*?\$").unwrap());
static AT_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[A-Za-z0-9_]+!?").unwrap());
static HASH_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"#[A-Za-z0-9_]+|#!").unwrap());

/// Sentinel as we emit it
static SENTINEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[VAR_(\d+)\]").unwrap());

/// Sentinel as a backend may return it (brackets dropped or padded)
static SENTINEL_LOOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[?\s*VAR_(\d+)\s*\]?").unwrap());

/// Bare sentinel index, for survival validation
static SENTINEL_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"VAR_(\d+)").unwrap());

/// Punctuation and whitespace ignored when deciding tag-only lines
static TAG_ONLY_FILLER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t.,!?:;]").unwrap());

static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,.])").unwrap());
static DOUBLE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").unwrap());

/// Classification of one source entry value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Eligible for translation
    Translatable,

    /// Nothing but tokens, punctuation and whitespace; copied verbatim
    TagOnly,

    /// Carries the single-line skip directive; copied verbatim
    SkipMarked,

    /// Falls inside an open no-translate region; copied verbatim
    RegionSkip,
}

/// No-translate region state carried by the caller across lines
///
/// Regions do not nest: a start marker inside an open region is inert and
/// the first end marker (or end of file) closes the region.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegionState {
    active: bool,
}

impl RegionState {
    pub fn new() -> Self {
        Self { active: false }
    }

    /// Update state for a raw line; returns true if the line is itself a
    /// region marker (marker lines are copied verbatim by the caller)
    pub fn observe(&mut self, line: &str) -> bool {
        if line.contains(REGION_START_MARKER) {
            self.active = true;
            return true;
        }
        if line.contains(REGION_END_MARKER) {
            self.active = false;
            return true;
        }
        false
    }

    /// Whether the scanner is currently inside a region
    pub fn active(&self) -> bool {
        self.active
    }
}

/// Result of masking a value: backend-safe text plus the extracted tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedText {
    /// Value with every token replaced by `[VAR_<n>]`
    pub text: String,

    /// Extracted tokens, indexed by sentinel number
    pub tokens: Vec<String>,
}

/// Classify one entry value
///
/// Pure function over the value, its trailing comment and the caller-held
/// region state. Lock detection is separate (see [`is_locked`]) because it
/// applies to the existing *target* line, not the source.
pub fn classify(value: &str, comment: &str, region: &RegionState) -> LineClass {
    if region.active() {
        return LineClass::RegionSkip;
    }
    if comment.contains(SKIP_MARKER) {
        return LineClass::SkipMarked;
    }
    if is_tag_only(&mask(value).text) {
        return LineClass::TagOnly;
    }
    LineClass::Translatable
}

/// Whether an existing target line's comment carries the lock directive
pub fn is_locked(comment: &str) -> bool {
    comment.contains(LOCK_MARKER)
}

/// Replace every recognized token with a `[VAR_<n>]` sentinel
pub fn mask(value: &str) -> MaskedText {
    let mut tokens: Vec<String> = Vec::new();

    let mut masked = mask_family(value, &BRACKET_TOKEN, &mut tokens);
    masked = mask_family(&masked, &DOLLAR_TOKEN, &mut tokens);
    masked = mask_family(&masked, &AT_TOKEN, &mut tokens);
    masked = mask_family(&masked, &HASH_TOKEN, &mut tokens);

    MaskedText { text: masked, tokens }
}

fn mask_family(text: &str, pattern: &Regex, tokens: &mut Vec<String>) -> String {
    pattern.replace_all(text, |caps: &regex::Captures| {
        let index = tokens.len();
        tokens.push(caps[0].to_string());
        format!("[VAR_{}]", index)
    }).into_owned()
}

/// Restore sentinels to their original tokens by index
///
/// Tolerates backends that drop or pad the sentinel brackets. Sentinels
/// with an out-of-range index are left as-is.
pub fn unmask(text: &str, tokens: &[String]) -> String {
    SENTINEL_LOOSE.replace_all(text, |caps: &regex::Captures| {
        match caps[1].parse::<usize>() {
            Ok(index) if index < tokens.len() => tokens[index].clone(),
            _ => caps[0].to_string(),
        }
    }).into_owned()
}

/// Indices of tokens that did not survive translation
///
/// Run against the still-masked backend output; a missing index means the
/// backend dropped or rewrote that sentinel.
pub fn missing_tokens(translated: &str, tokens: &[String]) -> Vec<usize> {
    let mut found = vec![false; tokens.len()];
    for caps in SENTINEL_INDEX.captures_iter(translated) {
        if let Ok(index) = caps[1].parse::<usize>() {
            if index < found.len() {
                found[index] = true;
            }
        }
    }
    found.iter()
        .enumerate()
        .filter_map(|(index, present)| if *present { None } else { Some(index) })
        .collect()
}

/// Whether a masked value contains nothing translatable
pub fn is_tag_only(masked: &str) -> bool {
    if masked.trim().is_empty() {
        return true;
    }
    let stripped = SENTINEL.replace_all(masked, "");
    let stripped = TAG_ONLY_FILLER.replace_all(&stripped, "");
    stripped.is_empty()
}

/// Normalize common backend formatting damage
pub fn cleanup(text: &str) -> String {
    let text = SPACE_BEFORE_PUNCT.replace_all(text, "$1");
    let text = DOUBLE_SPACE.replace_all(&text, " ");
    let text = text.replace("[[", "[").replace("]]", "]");
    text.trim().to_string()
}
