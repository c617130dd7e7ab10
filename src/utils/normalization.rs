//! Title Normalization Utilities
//!
//! Whitespace collapsing, edge trimming, whole-word term patterns, the
//! ignore-term filter and the frozen lookup-key normalizations used by the
//! special-case table.
//!
//! Matching is case-insensitive throughout, so filtered text keeps the
//! caller's casing; lowercasing only happens when building lookup keys.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Version of the special-case key normalization (`plain_key` / `filtered_key`).
///
/// Any change to either function changes which titles existing overrides
/// match; bump this when that happens.
pub const KEY_NORMALIZATION_VERSION: u32 = 1;

/// Punctuation trimmed from both ends of a title or fragment
pub const EDGE_PUNCTUATION: &[char] = &['.', ',', ';', ':', '-', '–', '—'];

/// Same as `\w` in the regex engine
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim whitespace and edge punctuation from both ends.
pub fn trim_edges(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || EDGE_PUNCTUATION.contains(&c))
}

/// Regex source matching `term` as a whole word.
///
/// `\b` is only added on a side where the term begins/ends with a word
/// character; a term like "(usa)" matches its literal parentheses instead.
pub fn word_pattern(term: &str) -> String {
    let escaped = regex::escape(term);
    let lead = if term.chars().next().is_some_and(is_word_char) { r"\b" } else { "" };
    let tail = if term.chars().last().is_some_and(is_word_char) { r"\b" } else { "" };
    format!("{}{}{}", lead, escaped, tail)
}

/// Compile a case-insensitive whole-word matcher for `term`.
///
/// Returns `None` (and logs) for blank terms or patterns the regex engine
/// rejects; callers skip the term rather than fail.
pub fn word_regex(term: &str) -> Option<Regex> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }

    match RegexBuilder::new(&word_pattern(term)).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("Skipping term '{}': {}", term, e);
            None
        }
    }
}

/// Uppercase the first letter of each whitespace-separated word.
pub fn title_case_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase, whitespace-collapsed, edge-trimmed form of a raw title.
///
/// Frozen: see `KEY_NORMALIZATION_VERSION`.
pub fn plain_key(raw: &str) -> String {
    trim_edges(&collapse_whitespace(&raw.to_lowercase())).to_string()
}

/// Replace every char inside the given byte ranges with spaces.
///
/// Byte offsets outside the ranges are unchanged, so spans found in the input
/// stay valid in the output.
pub fn blank_ranges(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, c) in text.char_indices() {
        if ranges.iter().any(|r| r.contains(&idx)) {
            out.extend(std::iter::repeat(' ').take(c.len_utf8()));
        } else {
            out.push(c);
        }
    }
    out
}

/// Byte ranges of closed `( … )` and `[ … ]` asides, brackets included.
pub fn parenthetical_ranges(text: &str) -> SmallVec<[Range<usize>; 2]> {
    let mut ranges = SmallVec::new();
    let mut open: Option<(usize, char)> = None;
    for (idx, c) in text.char_indices() {
        match (open, c) {
            (None, '(') | (None, '[') => open = Some((idx, c)),
            (Some((start, '(')), ')') | (Some((start, '[')), ']') => {
                ranges.push(start..idx + c.len_utf8());
                open = None;
            }
            _ => {}
        }
    }
    ranges
}

/// Removes configured noise terms from titles
#[derive(Debug, Clone)]
pub struct IgnoreTerms {
    terms: Vec<String>,
    /// One alternation over all terms, longest first
    pattern: Option<Regex>,
}

impl IgnoreTerms {
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Self {
        let mut terms: Vec<String> = terms
            .iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        let mut seen = FxHashSet::default();
        terms.retain(|t| seen.insert(t.clone()));

        let mut by_length: Vec<&String> = terms.iter().collect();
        by_length.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let pattern = if by_length.is_empty() {
            None
        } else {
            let alternation = by_length
                .iter()
                .map(|t| format!("(?:{})", word_pattern(t)))
                .collect::<Vec<_>>()
                .join("|");
            match RegexBuilder::new(&alternation).case_insensitive(true).build() {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("Ignore terms disabled, pattern rejected: {}", e);
                    None
                }
            }
        };

        Self { terms, pattern }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Blank out every ignore term, keeping all other text untouched.
    pub fn remove(&self, text: &str) -> String {
        match &self.pattern {
            Some(re) => re.replace_all(text, " ").into_owned(),
            None => text.to_string(),
        }
    }

    /// Remove ignore terms, collapse whitespace and trim edge punctuation.
    ///
    /// Quotes, commas, dashes and parentheses inside the text are kept for the
    /// cultivar rules. May return an empty string.
    pub fn strip(&self, title: &str) -> String {
        let removed = self.remove(title);
        let collapsed = collapse_whitespace(&removed);
        trim_edges(&tidy_separators(&collapsed)).to_string()
    }

    /// Ignore-filtered lookup key: `strip` then lowercase.
    ///
    /// Frozen: see `KEY_NORMALIZATION_VERSION`.
    pub fn filtered_key(&self, raw: &str) -> String {
        self.strip(raw).to_lowercase()
    }
}

/// Drop separators left dangling by term removal, e.g. "Kale, - Red" -> "Kale, Red".
fn tidy_separators(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for token in text.split(' ') {
        let is_separator = token.chars().all(|c| EDGE_PUNCTUATION.contains(&c));
        if is_separator {
            if let Some(prev) = out.last() {
                // A separator right after another separator, or after a word
                // already ending in one, carries nothing.
                if prev.chars().last().is_some_and(|c| EDGE_PUNCTUATION.contains(&c)) {
                    continue;
                }
            }
        }
        out.push(token);
    }
    out.join(" ")
}
