//! Cultivar Extractor
//!
//! Isolates the cultivar portion of a filtered title once the common name has
//! been located. Rules are tried in order and the first one producing a
//! non-empty candidate wins:
//!
//! 1. Quoted span: `Broccoli 'Di Cicco'`
//! 2. Comma clause: `Kale, Red Russian`
//! 3. Dash clause: `Mesclun Mix - Lettuce`
//! 4. Residual words: `Ruby Red Lettuce`
//!
//! Parenthetical asides are blanked before any rule runs and end up in the
//! descriptors.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::utils::normalization::{
    blank_ranges, collapse_whitespace, title_case_words, EDGE_PUNCTUATION,
};
use crate::vocabulary::Vocabulary;

/// Quoted span, one alternative per quote family so only the matching
/// closing quote ends it. The pair may not be glued to surrounding words, so
/// "Bull's" is not an opening quote; inside single quotes an apostrophe
/// followed by a letter ("'Bull's Blood'") does not close the span.
static QUOTED_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\W)("[^"]+"|“[^”]+”|'(?:[^']|'\w)+'|‘(?:[^’]|’\w)+’)(?:\W|$)"#).unwrap()
});

const DASHES: &[char] = &['-', '–', '—'];
const QUOTES: &[char] = &['\'', '"', '‘', '’', '“', '”'];
const BRACKETS: &[char] = &['(', ')', '[', ']'];

/// Extraction rules in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CultivarRule {
    Quoted,
    CommaClause,
    DashClause,
    Residual,
}

impl CultivarRule {
    pub const ORDER: [CultivarRule; 4] = [
        CultivarRule::Quoted,
        CultivarRule::CommaClause,
        CultivarRule::DashClause,
        CultivarRule::Residual,
    ];
}

/// Outcome of cultivar extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Final cultivar text, empty when none was found
    pub cultivar: String,
    /// Rule that produced the cultivar
    pub rule: Option<CultivarRule>,
    /// Title with the common name and cultivar spans blanked out
    pub remainder: String,
}

/// A rule's raw pick: candidate text and the spans it consumed
struct Candidate {
    text: String,
    spans: SmallVec<[Range<usize>; 2]>,
}

/// Ordered first-match-wins cultivar rules
#[derive(Debug, Clone, Copy)]
pub struct CultivarExtractor {
    max_residual_words: usize,
}

impl CultivarExtractor {
    pub fn new(max_residual_words: usize) -> Self {
        Self { max_residual_words }
    }

    /// Extract the cultivar from `text`.
    ///
    /// * `text` - filtered title, used for the remainder
    /// * `masked` - same text with parenthetical asides blanked (byte-aligned)
    /// * `common` - byte span of the matched common name
    pub fn extract(
        &self,
        text: &str,
        masked: &str,
        common: Range<usize>,
        vocabulary: &Vocabulary,
    ) -> Extraction {
        for rule in CultivarRule::ORDER {
            let candidate = match rule {
                CultivarRule::Quoted => quoted(masked, &common),
                CultivarRule::CommaClause => comma_clause(masked, &common),
                CultivarRule::DashClause => dash_clause(masked, &common),
                CultivarRule::Residual => self.residual(masked, &common),
            };

            if let Some(candidate) = candidate {
                tracing::debug!("Cultivar rule {:?} matched '{}'", rule, candidate.text);
                let cultivar = finish_candidate(&candidate.text, rule, vocabulary);
                let mut blanked: SmallVec<[Range<usize>; 4]> = smallvec![common.clone()];
                blanked.extend(candidate.spans);
                return Extraction {
                    cultivar,
                    rule: Some(rule),
                    remainder: blank_ranges(text, &blanked),
                };
            }
        }

        Extraction {
            cultivar: String::new(),
            rule: None,
            remainder: blank_ranges(text, &[common]),
        }
    }

    fn residual(&self, masked: &str, common: &Range<usize>) -> Option<Candidate> {
        let before = 0..common.start;
        let after = common.end..masked.len();
        let words = format!("{} {}", &masked[before.clone()], &masked[after.clone()]);
        let text = trim_candidate(&words);

        if text.is_empty() {
            return None;
        }
        if text.split_whitespace().count() > self.max_residual_words {
            // Too long for a cultivar name; leave it to the descriptors
            return None;
        }

        let mut spans = word_spans(masked, before);
        spans.extend(word_spans(masked, after));
        Some(Candidate {
            text: text.to_string(),
            spans,
        })
    }
}

/// Rule 1: first quoted span that does not overlap the common name
fn quoted(text: &str, common: &Range<usize>) -> Option<Candidate> {
    QUOTED_SPAN.captures_iter(text).find_map(|caps| {
        let quoted = caps.get(1)?;
        let span = quoted.range();
        if overlaps(&span, common) {
            return None;
        }
        let mut inner = quoted.as_str().chars();
        inner.next();
        inner.next_back();
        let content = inner.as_str().trim();
        (!content.is_empty()).then(|| Candidate {
            text: content.to_string(),
            spans: smallvec![span],
        })
    })
}

/// Rule 2: the comma-separated side that does not hold the common name
fn comma_clause(masked: &str, common: &Range<usize>) -> Option<Candidate> {
    let comma = masked.find(',')?;

    let region = if common.start > comma {
        // Common name on the right; take the clause just before the comma
        let start = separator_positions(&masked[..comma])
            .last()
            .map(|sep| sep.end)
            .unwrap_or(0);
        start..comma
    } else {
        // Common name on the left; take the clause just after the comma
        let start = comma + 1;
        let end = separator_positions(&masked[start..])
            .first()
            .map(|sep| start + sep.start)
            .unwrap_or(masked.len());
        start..end
    };

    candidate_in(masked, region)
}

/// Rule 3: the dash clause after the common name's clause, else the one before
fn dash_clause(masked: &str, common: &Range<usize>) -> Option<Candidate> {
    let separators = dash_separators(masked);
    if separators.is_empty() {
        return None;
    }

    let mut clauses: SmallVec<[Range<usize>; 4]> = SmallVec::new();
    let mut start = 0;
    for sep in &separators {
        clauses.push(start..sep.start);
        start = sep.end;
    }
    clauses.push(start..masked.len());

    let home = clauses
        .iter()
        .position(|clause| clause.contains(&common.start))?;

    let mut neighbours: SmallVec<[usize; 2]> = SmallVec::new();
    if home + 1 < clauses.len() {
        neighbours.push(home + 1);
    }
    if home > 0 {
        neighbours.push(home - 1);
    }

    neighbours
        .into_iter()
        .find_map(|idx| candidate_in(masked, clauses[idx].clone()))
}

fn candidate_in(masked: &str, region: Range<usize>) -> Option<Candidate> {
    let text = trim_candidate(&masked[region.clone()]);
    (!text.is_empty()).then(|| Candidate {
        text: text.to_string(),
        spans: word_spans(masked, region),
    })
}

/// Non-blank runs of `masked` inside `region`, so blanked asides survive
fn word_spans(masked: &str, region: Range<usize>) -> SmallVec<[Range<usize>; 2]> {
    let mut spans = SmallVec::new();
    let mut start: Option<usize> = None;
    for (idx, c) in masked[region.clone()].char_indices() {
        let idx = region.start + idx;
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(idx),
            (true, Some(s)) => {
                spans.push(s..idx);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(s..region.end);
    }
    spans
}

/// Dash runs with whitespace (or the text edge) on at least one side.
/// In-word hyphens such as "Non-GMO" never qualify.
fn dash_separators(text: &str) -> SmallVec<[Range<usize>; 4]> {
    let mut separators = SmallVec::new();
    let mut run: Option<usize> = None;

    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if DASHES.contains(&c) && run.is_none() {
            run = Some(idx);
        }
        let next = chars.peek().map(|&(_, n)| n);
        if let Some(start) = run {
            if next.map_or(true, |n| !DASHES.contains(&n)) {
                let end = idx + c.len_utf8();
                let before = text[..start].chars().last();
                let spaced_before = before.map_or(true, char::is_whitespace);
                let spaced_after = next.map_or(true, char::is_whitespace);
                if spaced_before || spaced_after {
                    separators.push(start..end);
                }
                run = None;
            }
        }
    }

    separators
}

/// Comma and dash separators in order of position
fn separator_positions(text: &str) -> SmallVec<[Range<usize>; 4]> {
    let mut positions: SmallVec<[Range<usize>; 4]> = text
        .match_indices(',')
        .map(|(idx, s)| idx..idx + s.len())
        .collect();
    positions.extend(dash_separators(text));
    positions.sort_by_key(|r| r.start);
    positions
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn trim_candidate(text: &str) -> &str {
    text.trim_matches(|c: char| {
        c.is_whitespace()
            || EDGE_PUNCTUATION.contains(&c)
            || QUOTES.contains(&c)
            || BRACKETS.contains(&c)
    })
}

/// Apply preserve-exact spellings and casing to a raw candidate
fn finish_candidate(raw: &str, rule: CultivarRule, vocabulary: &Vocabulary) -> String {
    if let Some(preserved) = vocabulary.preserved_spelling(raw) {
        return preserved.to_string();
    }
    if rule == CultivarRule::Quoted {
        return raw.to_string();
    }

    let collapsed = collapse_whitespace(raw);
    if collapsed.chars().any(char::is_uppercase) {
        collapsed
    } else {
        title_case_words(&collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::utils::normalization::parenthetical_ranges;

    fn vocabulary() -> Vocabulary {
        Vocabulary::from_config(&ParserConfig::builtin())
    }

    fn extract(text: &str, common: &str) -> Extraction {
        let start = text.find(common).unwrap();
        let masked = blank_ranges(text, &parenthetical_ranges(text));
        CultivarExtractor::new(3).extract(text, &masked, start..start + common.len(), &vocabulary())
    }

    #[test]
    fn test_quoted_rule() {
        let out = extract("Broccoli 'Di Cicco'", "Broccoli");
        assert_eq!(out.cultivar, "Di Cicco");
        assert_eq!(out.rule, Some(CultivarRule::Quoted));
        assert_eq!(out.remainder.trim(), "");

        let out = extract("“Early Wonder” Beet, Tall Top", "Beet");
        assert_eq!(out.cultivar, "Early Wonder");
        assert_eq!(out.rule, Some(CultivarRule::Quoted));
    }

    #[test]
    fn test_apostrophe_inside_quotes() {
        let out = extract("Beet \"Chioggia's Pride\" - 1 lb bag", "Beet");
        assert_eq!(out.cultivar, "Chioggia's Pride");
        assert_eq!(out.rule, Some(CultivarRule::Quoted));
        assert!(out.remainder.contains("1 lb bag"));

        let out = extract("Beet ‘Bull’s Blood’", "Beet");
        assert_eq!(out.cultivar, "Bull’s Blood");

        let out = extract("Beet 'Bull's Blood' Tall Top", "Beet");
        assert_eq!(out.cultivar, "Bull's Blood");
        assert!(out.remainder.contains("Tall Top"));

        let out = extract("Radish “Champion’s Red”", "Radish");
        assert_eq!(out.cultivar, "Champion’s Red");
    }

    #[test]
    fn test_quoted_wins_over_comma() {
        let out = extract("Radish, Spring 'Cherry Belle'", "Radish");
        assert_eq!(out.cultivar, "Cherry Belle");
        assert!(out.remainder.contains("Spring"));
    }

    #[test]
    fn test_apostrophe_is_not_a_quote() {
        let out = extract("Bull's Blood Beet", "Beet");
        assert_eq!(out.rule, Some(CultivarRule::Residual));
        assert_eq!(out.cultivar, "Bull's Blood");
    }

    #[test]
    fn test_comma_rule_both_sides() {
        let out = extract("Kale, Red Russian", "Kale");
        assert_eq!(out.cultivar, "Red Russian");
        assert_eq!(out.rule, Some(CultivarRule::CommaClause));

        let out = extract("Greencrops, 4010 Green Forage Pea", "Pea");
        assert_eq!(out.cultivar, "Greencrops");
        assert!(out.remainder.contains("4010 Green Forage"));
    }

    #[test]
    fn test_comma_clause_stops_at_next_separator() {
        let out = extract("Kale, Red Russian - 1 lb Bag", "Kale");
        assert_eq!(out.cultivar, "Red Russian");
        assert!(out.remainder.contains("1 lb Bag"));
    }

    #[test]
    fn test_dash_rule() {
        let out = extract("Mesclun Mix - Lettuce", "Lettuce");
        assert_eq!(out.cultivar, "Mesclun Mix");
        assert_eq!(out.rule, Some(CultivarRule::DashClause));

        let out = extract("Kale – Lacinato – Bulk", "Kale");
        assert_eq!(out.cultivar, "Lacinato");
        assert!(out.remainder.contains("Bulk"));
    }

    #[test]
    fn test_in_word_hyphen_is_not_a_separator() {
        assert!(dash_separators("Pak-Choi Extra-Dwarf").is_empty());
        assert_eq!(dash_separators("Kale - Red").len(), 1);
        assert_eq!(dash_separators("Kale -Red").len(), 1);
        assert_eq!(dash_separators("Kale -- Red").len(), 1);
    }

    #[test]
    fn test_residual_rule() {
        let out = extract("Ruby Red Lettuce", "Lettuce");
        assert_eq!(out.cultivar, "Ruby Red");
        assert_eq!(out.rule, Some(CultivarRule::Residual));

        let out = extract("dwarf siberian kale", "kale");
        assert_eq!(out.cultivar, "Dwarf Siberian");
    }

    #[test]
    fn test_residual_too_long_is_descriptors() {
        let out = extract("Kale Grown On Our Family Farm", "Kale");
        assert_eq!(out.cultivar, "");
        assert_eq!(out.rule, None);
        assert!(out.remainder.contains("Family Farm"));
    }

    #[test]
    fn test_parentheticals_are_set_aside() {
        let out = extract("Green Peas (USA)", "Green Peas");
        assert_eq!(out.cultivar, "");
        assert!(out.remainder.contains("(USA)"));

        let out = extract("Kale, Red Russian (1 lb)", "Kale");
        assert_eq!(out.cultivar, "Red Russian");
        assert!(out.remainder.contains("(1 lb)"));
    }

    #[test]
    fn test_preserve_exact_spelling() {
        let out = extract("Beet, BULL'S BLOOD", "Beet");
        assert_eq!(out.cultivar, "Bull's Blood");

        let out = extract("sunflower 'usda certified black oil'", "sunflower");
        assert_eq!(out.cultivar, "USDA Certified  Black Oil");
    }
}
