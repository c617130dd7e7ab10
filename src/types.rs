//! Shared result types for title parsing.
//!
//! A parse always yields a `ParseResult`; how it was reached is recorded in
//! `MatchStatus` so callers can tell a vocabulary hit from a best-effort
//! fallback without inspecting the strings.

use serde::{Deserialize, Serialize};

use crate::utils::display_name::format_name;

/// How a `ParseResult` was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// A vocabulary common name was found in the title.
    Matched,
    /// The title hit the special-case table; the general pipeline was skipped.
    SpecialCase,
    /// No vocabulary entry matched; `common_name` holds the cleaned title.
    Unmatched,
    /// The title was empty or whitespace-only.
    #[default]
    Empty,
}

impl MatchStatus {
    /// True when `common_name` came from the vocabulary or the special-case table.
    pub fn is_confident(self) -> bool {
        matches!(self, MatchStatus::Matched | MatchStatus::SpecialCase)
    }
}

/// Structured taxonomy record for one product title.
///
/// String fields are never absent: "no cultivar" is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseResult {
    pub common_name: String,
    pub cultivar_name: String,
    pub additional_descriptors: String,
    #[serde(default)]
    pub status: MatchStatus,
}

impl ParseResult {
    pub fn new(
        common_name: impl Into<String>,
        cultivar_name: impl Into<String>,
        additional_descriptors: impl Into<String>,
        status: MatchStatus,
    ) -> Self {
        Self {
            common_name: common_name.into(),
            cultivar_name: cultivar_name.into(),
            additional_descriptors: additional_descriptors.into(),
            status,
        }
    }

    /// All-empty result for blank titles.
    pub fn empty() -> Self {
        Self {
            status: MatchStatus::Empty,
            ..Self::default()
        }
    }

    /// Display string `Common 'Cultivar' descriptors`, recomputed on every call.
    pub fn formatted(&self) -> String {
        format_name(
            &self.common_name,
            &self.cultivar_name,
            Some(&self.additional_descriptors),
        )
    }

    pub fn has_cultivar(&self) -> bool {
        !self.cultivar_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = ParseResult::empty();
        assert_eq!(result.common_name, "");
        assert_eq!(result.cultivar_name, "");
        assert_eq!(result.additional_descriptors, "");
        assert_eq!(result.status, MatchStatus::Empty);
        assert!(!result.status.is_confident());
    }

    #[test]
    fn test_default_result_is_empty() {
        assert_eq!(ParseResult::default(), ParseResult::empty());
        assert_eq!(MatchStatus::default(), MatchStatus::Empty);

        // A record without a status is not taken as a vocabulary match
        let parsed: ParseResult =
            serde_json::from_str(r#"{"common_name":"","cultivar_name":"","additional_descriptors":""}"#)
                .unwrap();
        assert!(!parsed.status.is_confident());
    }

    #[test]
    fn test_formatted_is_recomputed() {
        let mut result = ParseResult::new("Kale", "Red Russian", "", MatchStatus::Matched);
        assert_eq!(result.formatted(), "Kale 'Red Russian'");

        result.cultivar_name = "Dwarf Siberian".to_string();
        assert_eq!(result.formatted(), "Kale 'Dwarf Siberian'");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&MatchStatus::SpecialCase).unwrap();
        assert_eq!(json, "\"special_case\"");
    }
}
