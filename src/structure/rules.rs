//! Ordered pattern tables shared by the heading heuristics.
//!
//! Each table is evaluated top-down and the first matching rule wins, so
//! the order of the entries is the precedence order.

use regex::Regex;

use crate::model::HeadingLevel;

/// "1 Introduction", "2. Methods"
pub const NUMBERED_HEADING: &str = r"^\d+\.?\s+[A-Z]";
/// "EXECUTIVE SUMMARY"
pub const ALL_CAPS_LINE: &str = r"^[A-Z][A-Z\s]+$";
/// "Related Work"
pub const TITLE_CASE_LINE: &str = r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*$";
/// "3.2 ", "3.2. "
pub const NUMBERED_SUBSECTION: &str = r"^\d+\.\d+\.?\s+";

/// Leading numbering removed by the optional display-text cleanup.
const NUMBERING_PREFIX: &str = r"^\d+(?:\.\d+)*\.?\s+";

/// Minimum heading length in characters (inclusive).
pub const MIN_HEADING_CHARS: usize = 3;
/// Maximum heading length in characters (inclusive).
pub const MAX_HEADING_CHARS: usize = 150;

/// A named regular expression.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub name: &'static str,
    pub regex: Regex,
}

/// An ordered list of pattern rules.
#[derive(Debug, Clone)]
pub struct PatternSet {
    rules: Vec<PatternRule>,
}

impl PatternSet {
    /// Compile a table of `(name, pattern)` entries.
    ///
    /// # Panics
    ///
    /// Panics if a pattern is not a valid regular expression. All tables in
    /// this crate are compile-time constants.
    pub fn compile(table: &[(&'static str, &str)]) -> Self {
        let rules = table
            .iter()
            .map(|(name, pattern)| PatternRule {
                name,
                regex: Regex::new(pattern).expect("heading pattern table contains an invalid regex"),
            })
            .collect();
        Self { rules }
    }

    /// Name of the first rule matching `text`.
    pub fn first_match(&self, text: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.regex.is_match(text))
            .map(|rule| rule.name)
    }

    /// Whether any rule matches `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// Number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Text patterns that make a span heading-like regardless of its font.
pub fn heading_patterns() -> PatternSet {
    PatternSet::compile(&[
        ("numbered", NUMBERED_HEADING),
        ("all-caps", ALL_CAPS_LINE),
        ("title-case", TITLE_CASE_LINE),
        ("numbered-subsection", NUMBERED_SUBSECTION),
    ])
}

/// Heading patterns usable on plain text lines (no font information).
pub fn line_heading_patterns() -> PatternSet {
    PatternSet::compile(&[
        ("numbered", NUMBERED_HEADING),
        ("all-caps", ALL_CAPS_LINE),
        ("title-case", TITLE_CASE_LINE),
    ])
}

/// Lowercased text that is never a heading: page labels, captions, links.
pub fn noise_patterns() -> PatternSet {
    PatternSet::compile(&[
        ("bare-number", r"^\d+$"),
        ("page-label", r"^page\s+\d+"),
        ("figure-caption", r"^figure\s+\d+"),
        ("table-caption", r"^table\s+\d+"),
        ("url", r"^(?:www\.|https?://)"),
        ("email", r"^\w+@\w+\."),
    ])
}

/// Case-insensitive alternation of literal terms, each matched as whole
/// words. Terms ending in punctuation ("theme:") only anchor their word
/// side.
pub fn term_alternation(terms: &[&str]) -> Regex {
    let alternatives: Vec<String> = terms
        .iter()
        .map(|term| {
            let word_edge = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
            let start = if word_edge(term.chars().next()) { r"\b" } else { "" };
            let end = if word_edge(term.chars().last()) { r"\b" } else { "" };
            format!("{}{}{}", start, regex::escape(term), end)
        })
        .collect();

    Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))).expect("escaped term list is a valid regex")
}

/// Whether a trimmed text has a plausible heading length.
pub fn has_heading_length(text: &str) -> bool {
    let len = text.chars().count();
    (MIN_HEADING_CHARS..=MAX_HEADING_CHARS).contains(&len)
}

/// Explicit numbering to level, most specific pattern first.
#[derive(Debug, Clone)]
pub struct NumberingRules {
    rules: Vec<(Regex, HeadingLevel)>,
}

impl NumberingRules {
    /// Build the standard table: `1.2.3 ` → H3, `1.2 ` → H2, `1 ` → H1.
    pub fn new() -> Self {
        let table = [
            (r"^\d+\.\d+\.\d+\s", HeadingLevel::H3),
            (r"^\d+\.\d+\s", HeadingLevel::H2),
            (r"^\d+\s", HeadingLevel::H1),
        ];
        let rules = table
            .iter()
            .map(|(pattern, level)| {
                (
                    Regex::new(pattern).expect("numbering table contains an invalid regex"),
                    *level,
                )
            })
            .collect();
        Self { rules }
    }

    /// Level implied by the numbering prefix of `text`, if any.
    pub fn level_for(&self, text: &str) -> Option<HeadingLevel> {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(text))
            .map(|(_, level)| *level)
    }
}

impl Default for NumberingRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Heading text cleanup.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    trailing_dots: Regex,
    edge_symbols: Regex,
    numbering_prefix: Regex,
}

impl TextCleaner {
    pub fn new() -> Self {
        Self {
            trailing_dots: Regex::new(r"[\s.]+$").expect("valid regex"),
            edge_symbols: Regex::new(r"^\W+|\W+$").expect("valid regex"),
            numbering_prefix: Regex::new(NUMBERING_PREFIX).expect("valid regex"),
        }
    }

    /// Strip trailing dot/space runs, then non-word runs at either edge.
    pub fn clean(&self, text: &str) -> String {
        let text = self.trailing_dots.replace(text, "");
        let text = self.edge_symbols.replace_all(&text, "");
        text.trim().to_string()
    }

    /// Remove a leading "1.2. " style prefix; returns the input when
    /// nothing would remain.
    pub fn strip_numbering(&self, text: &str) -> String {
        let stripped = self.numbering_prefix.replace(text, "");
        let stripped = stripped.trim();
        if stripped.is_empty() {
            text.to_string()
        } else {
            stripped.to_string()
        }
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}
