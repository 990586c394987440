//! Heading detection and level assignment.

use std::collections::HashSet;

use log::debug;
use regex::Regex;

use crate::config::{LevelPolicy, StructureOptions};
use crate::model::{HeadingCandidate, HeadingLevel, TextSpan};

use super::rules::{self, NumberingRules, PatternSet, TextCleaner};

/// Size above which a span counts as heading-like without other evidence.
pub const HEADING_SIZE_THRESHOLD: f32 = 12.0;

/// Distinct font sizes of a document's headings, largest first.
///
/// Sizes are compared at 0.1pt precision so rendering jitter does not
/// create spurious tiers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontTiers {
    sizes: Vec<i32>,
}

impl FontTiers {
    /// Number of tiers that map to distinct levels.
    pub const MAX_TIERS: usize = 3;

    /// Collect the top three distinct sizes.
    pub fn from_sizes<I: IntoIterator<Item = f32>>(sizes: I) -> Self {
        let mut keys: Vec<i32> = sizes.into_iter().map(size_key).collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));
        keys.dedup();
        keys.truncate(Self::MAX_TIERS);
        Self { sizes: keys }
    }

    /// Level for a font size; sizes outside the top tiers are H3.
    pub fn level_for(&self, size: f32) -> HeadingLevel {
        let key = size_key(size);
        self.sizes
            .iter()
            .position(|&tier| tier == key)
            .map(HeadingLevel::from_tier)
            .unwrap_or(HeadingLevel::H3)
    }

    /// Tier sizes in points, largest first.
    pub fn sizes(&self) -> Vec<f32> {
        self.sizes.iter().map(|&k| k as f32 / 10.0).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Fixed thresholds: >= 16pt H1, >= 14pt H2, else H3.
pub fn absolute_level(size: f32) -> HeadingLevel {
    if size >= 16.0 {
        HeadingLevel::H1
    } else if size >= 14.0 {
        HeadingLevel::H2
    } else {
        HeadingLevel::H3
    }
}

/// Keyword tables for heading importance.
///
/// Scoring: base 1, +3 for a high-value term, +2 for a medium-value term,
/// +2 for a section marker. Each table contributes at most once. Terms match
/// whole words, so "Background" does not count as "round".
#[derive(Debug, Clone)]
pub struct ImportanceRules {
    high_value: Regex,
    medium_value: Regex,
    section_markers: Regex,
}

impl ImportanceRules {
    pub const BASE_SCORE: i32 = 1;
    pub const HIGH_VALUE_BONUS: i32 = 3;
    pub const MEDIUM_VALUE_BONUS: i32 = 2;
    pub const SECTION_MARKER_BONUS: i32 = 2;

    const HIGH_VALUE_TERMS: &'static [&'static str] = &[
        "round 1a",
        "round 1b",
        "challenge",
        "mission",
        "your mission",
        "what you need to build",
        "requirements",
        "constraints",
        "scoring",
        "submission",
        "deliverables",
        "approach",
        "technical",
        "overview",
        "journey ahead",
        "why this matters",
        "what not to do",
        "pro tips",
    ];

    const MEDIUM_VALUE_TERMS: &'static [&'static str] = &[
        "docker",
        "execution",
        "expected",
        "scoring criteria",
        "checklist",
        "sample",
        "test case",
        "input",
        "output",
        "format",
        "structure",
    ];

    const SECTION_MARKERS: &'static [&'static str] = &["round", "challenge", "theme:", "brief"];

    pub fn new() -> Self {
        Self {
            high_value: rules::term_alternation(Self::HIGH_VALUE_TERMS),
            medium_value: rules::term_alternation(Self::MEDIUM_VALUE_TERMS),
            section_markers: rules::term_alternation(Self::SECTION_MARKERS),
        }
    }

    /// Importance of a heading text.
    pub fn score(&self, text: &str) -> i32 {
        let mut score = Self::BASE_SCORE;
        if self.high_value.is_match(text) {
            score += Self::HIGH_VALUE_BONUS;
        }
        if self.medium_value.is_match(text) {
            score += Self::MEDIUM_VALUE_BONUS;
        }
        if self.section_markers.is_match(text) {
            score += Self::SECTION_MARKER_BONUS;
        }
        score
    }
}

impl Default for ImportanceRules {
    fn default() -> Self {
        Self::new()
    }
}

/// A span that passed the heading filters, before its level is known.
#[derive(Debug)]
struct Pending<'a> {
    text: String,
    numbered: Option<HeadingLevel>,
    span: &'a TextSpan,
}

/// Turns formatted spans into heading candidates.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    policy: LevelPolicy,
    strip_numbering: bool,
    skip_noise: bool,
    heading_patterns: PatternSet,
    noise_patterns: PatternSet,
    numbering: NumberingRules,
    cleaner: TextCleaner,
    importance: ImportanceRules,
}

impl HeadingClassifier {
    pub fn new(options: &StructureOptions) -> Self {
        Self {
            policy: options.level_policy,
            strip_numbering: options.strip_numbering,
            skip_noise: options.skip_noise,
            heading_patterns: rules::heading_patterns(),
            noise_patterns: rules::noise_patterns(),
            numbering: NumberingRules::new(),
            cleaner: TextCleaner::new(),
            importance: ImportanceRules::new(),
        }
    }

    /// Whether a span looks like a heading: a heading text pattern, a large
    /// font or bold.
    pub fn is_heading_like(&self, span: &TextSpan, text: &str) -> bool {
        self.heading_patterns.is_match(text)
            || span.font_size > HEADING_SIZE_THRESHOLD
            || span.is_bold()
    }

    /// Classify all spans of a document, given in page order.
    ///
    /// Output preserves reading order; cleaned texts are unique
    /// case-insensitively.
    pub fn classify(&self, spans: &[TextSpan]) -> Vec<HeadingCandidate> {
        let mut seen = HashSet::new();
        let mut pending = Vec::new();

        for span in spans {
            let raw = span.text.trim();
            if !rules::has_heading_length(raw) || !self.is_heading_like(span, raw) {
                continue;
            }
            if self.skip_noise {
                if let Some(rule) = self.noise_patterns.first_match(&raw.to_lowercase()) {
                    debug!("Skipping {:?}: {}", raw, rule);
                    continue;
                }
            }

            // Numbering is read from the raw text; display text is final
            // before the uniqueness check.
            let mut text = self.cleaner.clean(raw);
            if self.strip_numbering {
                text = self.cleaner.strip_numbering(&text);
            }
            if text.is_empty() || !seen.insert(text.to_lowercase()) {
                continue;
            }

            pending.push(Pending {
                text,
                numbered: self.numbering.level_for(raw),
                span,
            });
        }

        let tiers = FontTiers::from_sizes(pending.iter().map(|p| p.span.font_size));
        debug!("Font tiers: {:?}", tiers.sizes());

        pending
            .into_iter()
            .map(|p| {
                let level = p.numbered.unwrap_or_else(|| match self.policy {
                    LevelPolicy::Tiered => tiers.level_for(p.span.font_size),
                    LevelPolicy::Absolute => absolute_level(p.span.font_size),
                });
                let mut candidate =
                    HeadingCandidate::new(level, p.text, p.span.page_index + 1, p.span.font_size);
                candidate.importance = Some(self.importance.score(&candidate.text));
                candidate
            })
            .collect()
    }
}

impl Default for HeadingClassifier {
    fn default() -> Self {
        Self::new(&StructureOptions::default())
    }
}

/// Stable re-sort by importance descending, then page ascending.
pub fn sort_by_importance(headings: &mut [HeadingCandidate]) {
    headings.sort_by(|a, b| {
        b.importance
            .unwrap_or(0)
            .cmp(&a.importance.unwrap_or(0))
            .then(a.page_number.cmp(&b.page_number))
    });
}
