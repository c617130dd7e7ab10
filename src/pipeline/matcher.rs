//! Common-Name Matcher
//!
//! Finds the vocabulary literal present in a filtered title, preferring the
//! longest one so "forage pea" wins over "pea" and "swiss chard" over "chard".
//! The matched literal is resolved to its canonical display name.

use std::ops::Range;

use regex::Regex;

use crate::utils::normalization::word_regex;
use crate::vocabulary::Vocabulary;

/// A vocabulary hit inside a filtered title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    /// Lowercase vocabulary literal that matched
    pub literal: String,
    /// Display name after equivalence resolution
    pub canonical: String,
    /// Byte span of the match in the searched text
    pub span: Range<usize>,
}

#[derive(Debug, Clone)]
struct MatchEntry {
    literal: String,
    canonical: String,
    pattern: Regex,
}

/// Longest-first, token-aligned matcher over a vocabulary
#[derive(Debug, Clone, Default)]
pub struct CommonNameMatcher {
    entries: Vec<MatchEntry>,
}

impl CommonNameMatcher {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let mut literals = vocabulary.match_literals();
        literals.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        let entries = literals
            .into_iter()
            .filter_map(|literal| {
                let canonical = vocabulary.canonical_name(&literal)?;
                let pattern = word_regex(&literal)?;
                Some(MatchEntry {
                    literal,
                    canonical,
                    pattern,
                })
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest vocabulary literal occurring as whole words in `text`.
    pub fn find(&self, text: &str) -> Option<NameMatch> {
        if text.trim().is_empty() {
            return None;
        }

        self.entries.iter().find_map(|entry| {
            entry.pattern.find(text).map(|m| NameMatch {
                literal: entry.literal.clone(),
                canonical: entry.canonical.clone(),
                span: m.range(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use std::collections::BTreeMap;

    fn matcher_with(names: &[&str], equivalents: &[(&str, &str)]) -> CommonNameMatcher {
        let mut config = ParserConfig::empty();
        config.name_equivalents = equivalents
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>();
        CommonNameMatcher::new(&Vocabulary::new(names, &config))
    }

    #[test]
    fn test_longest_match_wins() {
        let matcher = matcher_with(&["Pea", "Forage Pea"], &[]);
        let found = matcher.find("4010 Green Forage Pea").unwrap();
        assert_eq!(found.canonical, "Forage Pea");
        assert_eq!(found.span, 11..21);
    }

    #[test]
    fn test_equivalence_applied() {
        let matcher = matcher_with(&["Swiss Chard", "Pea"], &[("chard", "Swiss Chard"), ("green pea", "Pea")]);
        assert_eq!(matcher.find("Rainbow Chard").unwrap().canonical, "Swiss Chard");
        assert_eq!(matcher.find("Swiss Chard, Bright Lights").unwrap().literal, "swiss chard");

        let found = matcher.find("Dwarf Green Pea").unwrap();
        assert_eq!(found.literal, "green pea");
        assert_eq!(found.canonical, "Pea");
    }

    #[test]
    fn test_match_is_token_aligned() {
        let matcher = matcher_with(&["Pea", "Rye"], &[]);
        assert!(matcher.find("Peanut Butter").is_none());
        assert!(matcher.find("Ryegrass").is_none());
        assert_eq!(matcher.find("SNOW PEA").unwrap().canonical, "Pea");
    }

    #[test]
    fn test_no_match_on_empty_text() {
        let matcher = matcher_with(&["Kale"], &[]);
        assert!(matcher.find("").is_none());
        assert!(matcher.find("   ").is_none());
    }
}
