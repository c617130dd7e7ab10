//! Compatibility adapter for callers using the older field names.
//!
//! Older consumers read `cultivar` for what is now `common_name` and
//! `plant_variety` for what is now `cultivar_name`. `LegacyRecord` owns a
//! single `ParseResult` and derives both views from it, so they always agree.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::types::{MatchStatus, ParseResult};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegacyRecord {
    result: ParseResult,
}

impl LegacyRecord {
    pub fn new(result: ParseResult) -> Self {
        Self { result }
    }

    pub fn result(&self) -> &ParseResult {
        &self.result
    }

    pub fn into_result(self) -> ParseResult {
        self.result
    }

    pub fn common_name(&self) -> &str {
        &self.result.common_name
    }

    pub fn cultivar_name(&self) -> &str {
        &self.result.cultivar_name
    }

    pub fn additional_descriptors(&self) -> &str {
        &self.result.additional_descriptors
    }

    pub fn status(&self) -> MatchStatus {
        self.result.status
    }

    /// Legacy name for the common name
    pub fn cultivar(&self) -> &str {
        self.common_name()
    }

    /// Legacy name for the cultivar name
    pub fn plant_variety(&self) -> &str {
        self.cultivar_name()
    }

    pub fn formatted(&self) -> String {
        self.result.formatted()
    }
}

impl From<ParseResult> for LegacyRecord {
    fn from(result: ParseResult) -> Self {
        Self::new(result)
    }
}

impl Serialize for LegacyRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LegacyRecord", 6)?;
        state.serialize_field("common_name", self.common_name())?;
        state.serialize_field("cultivar_name", self.cultivar_name())?;
        state.serialize_field("additional_descriptors", self.additional_descriptors())?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("cultivar", self.cultivar())?;
        state.serialize_field("plant_variety", self.plant_variety())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_accessors_mirror_result() {
        let record = LegacyRecord::new(ParseResult::new("Kale", "Red Russian", "", MatchStatus::Matched));
        assert_eq!(record.cultivar(), "Kale");
        assert_eq!(record.plant_variety(), "Red Russian");
        assert_eq!(record.formatted(), "Kale 'Red Russian'");
    }

    #[test]
    fn test_default_record_is_empty() {
        let record = LegacyRecord::default();
        assert_eq!(record.status(), MatchStatus::Empty);
        assert_eq!(record.cultivar(), "");
    }

    #[test]
    fn test_serializes_both_conventions() {
        let record = LegacyRecord::from(ParseResult::new("Beet", "Bull's Blood", "Tall", MatchStatus::Matched));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["common_name"], "Beet");
        assert_eq!(json["cultivar"], "Beet");
        assert_eq!(json["cultivar_name"], "Bull's Blood");
        assert_eq!(json["plant_variety"], "Bull's Blood");
        assert_eq!(json["additional_descriptors"], "Tall");
        assert_eq!(json["status"], "matched");
    }
}
