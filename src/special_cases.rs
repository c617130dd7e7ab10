//! Special-Case Table
//!
//! Exact-title overrides checked before the general pipeline. A hit returns
//! the stored result verbatim.
//!
//! Lookup keys (frozen, see `KEY_NORMALIZATION_VERSION`), tried in order:
//! 1. `plain_key`: lowercased, whitespace collapsed, edge punctuation trimmed
//! 2. `IgnoreTerms::filtered_key`: ignore terms removed, lowercased
//!
//! Table keys are stored in `plain_key` form and the plain key is tried first,
//! so every key parses to its own entry even when its filtered form equals
//! another key.

use std::collections::BTreeMap;

use crate::config::SpecialCaseEntry;
use crate::types::{MatchStatus, ParseResult};
use crate::utils::normalization::{plain_key, IgnoreTerms};

/// Ordered exact-match override table
#[derive(Debug, Clone, Default)]
pub struct SpecialCaseTable {
    entries: BTreeMap<String, ParseResult>,
}

impl SpecialCaseTable {
    pub fn new(entries: &[SpecialCaseEntry]) -> Self {
        let mut table = BTreeMap::new();
        for entry in entries {
            let key = plain_key(&entry.key);
            if key.is_empty() || entry.common_name.trim().is_empty() {
                tracing::warn!("Skipping special case with empty key or common name: {:?}", entry);
                continue;
            }
            let result = ParseResult::new(
                entry.common_name.trim(),
                entry.cultivar_name.trim(),
                entry.additional_descriptors.trim(),
                MatchStatus::SpecialCase,
            );
            if table.insert(key.clone(), result).is_some() {
                tracing::warn!("Duplicate special case key '{}', keeping the later entry", key);
            }
        }
        Self { entries: table }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by an already-normalized key
    pub fn get(&self, key: &str) -> Option<&ParseResult> {
        self.entries.get(key)
    }

    /// Look up a raw title: plain key first, then the ignore-filtered key.
    pub fn lookup(&self, raw_title: &str, ignore: &IgnoreTerms) -> Option<&ParseResult> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries
            .get(&plain_key(raw_title))
            .or_else(|| self.entries.get(&ignore.filtered_key(raw_title)))
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParseResult)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
