use std::collections::HashMap;
use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Line-oriented localization file model

// @const: Entry line regex (indent, key, quoted value, trailing comment)
static ENTRY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\s*)([^:#]+):\s*"(.*)"(.*)$"#).unwrap()
});

// @const: Language header regex (`l_english:`)
static HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)(l_[a-z_]+):\s*$").unwrap()
});

// @struct: Single parsed entry line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocEntry {
    // @field: Leading whitespace, preserved on render
    pub indent: String,

    // @field: Entry key as written (may carry trailing spaces)
    pub key: String,

    // @field: Text between the quotes
    pub value: String,

    // @field: Everything after the closing quote, usually a comment
    pub comment: String,
}

impl LocEntry {
    /// Key with surrounding whitespace removed, for lookups
    pub fn key_trimmed(&self) -> &str {
        self.key.trim()
    }
}

impl fmt::Display for LocEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}: \"{}\"{}", self.indent, self.key, self.value, self.comment)
    }
}

/// One line of a localization file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocLine {
    /// Language header line (`l_english:`)
    Header {
        /// Leading whitespace
        indent: String,
        /// Header id, e.g. "l_english"
        id: String,
    },

    /// Key/value entry line
    Entry(LocEntry),

    /// Anything else (comments, blank lines, unparsed content), kept verbatim
    Raw(String),
}

impl fmt::Display for LocLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocLine::Header { indent, id } => write!(f, "{}{}:", indent, id),
            LocLine::Entry(entry) => write!(f, "{}", entry),
            LocLine::Raw(raw) => write!(f, "{}", raw),
        }
    }
}

/// Ordered sequence of localization lines
///
/// Parsing never fails: a line that is not a header or an entry is carried
/// as [`LocLine::Raw`] and rendered back verbatim, so ordering and opaque
/// content survive a parse/render round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocFile {
    /// Lines in file order
    pub lines: Vec<LocLine>,
}

impl LocFile {
    /// Parse file content (BOM already stripped) into lines
    pub fn parse(content: &str) -> Self {
        let lines = content
            .lines()
            .map(|line| {
                let line = line.strip_suffix('\r').unwrap_or(line);
                if let Some(caps) = HEADER_REGEX.captures(line) {
                    return LocLine::Header {
                        indent: caps[1].to_string(),
                        id: caps[2].to_string(),
                    };
                }
                if let Some(caps) = ENTRY_REGEX.captures(line) {
                    return LocLine::Entry(LocEntry {
                        indent: caps[1].to_string(),
                        key: caps[2].to_string(),
                        value: caps[3].to_string(),
                        comment: caps[4].to_string(),
                    });
                }
                LocLine::Raw(line.to_string())
            })
            .collect();

        Self { lines }
    }

    /// Render back to text with `\n` endings and a trailing newline
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }

    /// Map from trimmed key to entry, for merging against an existing target
    ///
    /// On duplicate keys the last occurrence wins, matching how the game
    /// resolves them.
    pub fn entry_map(&self) -> HashMap<&str, &LocEntry> {
        let mut map = HashMap::new();
        for line in &self.lines {
            if let LocLine::Entry(entry) = line {
                map.insert(entry.key_trimmed(), entry);
            }
        }
        map
    }

    /// Number of entry lines
    pub fn entry_count(&self) -> usize {
        self.lines.iter().filter(|line| matches!(line, LocLine::Entry(_))).count()
    }

    /// The header id, if the file has one
    pub fn header_id(&self) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            LocLine::Header { id, .. } => Some(id.as_str()),
            _ => None,
        })
    }
}
