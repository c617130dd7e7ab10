//! Vocabulary Harvest
//!
//! Collects common names and cultivars from parsed titles and writes them
//! back out as the `common_names.csv` / `cultivars.csv` pair that
//! `Vocabulary::load` reads. Running a catalogue through the parser and
//! harvesting the output grows the registry between releases.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::path::Path;

use polars::prelude::*;

use crate::compat::LegacyRecord;
use crate::error::LoadError;
use crate::types::ParseResult;
use crate::vocabulary::{Vocabulary, COMMON_NAMES_FILE, CULTIVARS_FILE};

/// Accumulated names, sorted and de-duplicated
#[derive(Debug, Clone, Default)]
pub struct VocabularyHarvest {
    common_names: BTreeSet<String>,
    cultivars: BTreeMap<String, BTreeSet<String>>,
}

impl VocabularyHarvest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parse result. Only confident results contribute; returns whether
    /// anything was recorded.
    pub fn add_result(&mut self, result: &ParseResult) -> bool {
        if !result.status.is_confident() {
            return false;
        }
        self.insert(&result.common_name, &result.cultivar_name)
    }

    /// Add a record in the legacy shape (`cultivar` = common name,
    /// `plant_variety` = cultivar). Accepted only when `cultivar` is a known
    /// common name, which is then stored under its canonical spelling.
    pub fn add_legacy(&mut self, cultivar: &str, plant_variety: &str, vocabulary: &Vocabulary) -> bool {
        match vocabulary.canonical_name(cultivar) {
            Some(canonical) => self.insert(&canonical, plant_variety),
            None => {
                tracing::debug!("Legacy record '{}' is not a known common name", cultivar);
                false
            }
        }
    }

    /// Add a `LegacyRecord` produced by the parser
    pub fn add_record(&mut self, record: &LegacyRecord) -> bool {
        self.add_result(record.result())
    }

    pub fn common_names(&self) -> impl Iterator<Item = &str> {
        self.common_names.iter().map(String::as_str)
    }

    /// `(common_name, cultivar_name)` pairs, sorted
    pub fn cultivars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cultivars.iter().flat_map(|(common, cultivars)| {
            cultivars.iter().map(move |c| (common.as_str(), c.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.common_names.is_empty()
    }

    /// Write `common_names.csv` and `cultivars.csv` into `dir`, creating it
    /// if needed.
    pub fn write_csvs(&self, dir: &Path) -> Result<(), LoadError> {
        fs::create_dir_all(dir).map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let names: Vec<&str> = self.common_names().collect();
        let (commons, cultivars): (Vec<&str>, Vec<&str>) = self.cultivars().unzip();

        let names_path = dir.join(COMMON_NAMES_FILE);
        let names_df = df! { "common_name" => names };
        write_csv(&names_path, names_df)?;

        let cultivars_path = dir.join(CULTIVARS_FILE);
        let cultivars_df = df! {
            "common_name" => commons,
            "cultivar_name" => cultivars,
        };
        write_csv(&cultivars_path, cultivars_df)?;

        tracing::info!(
            "Harvested {} common names and {} cultivars into {:?}",
            self.common_names.len(),
            self.cultivars.values().map(BTreeSet::len).sum::<usize>(),
            dir
        );
        Ok(())
    }

    fn insert(&mut self, common_name: &str, cultivar_name: &str) -> bool {
        let common = common_name.trim();
        if common.is_empty() {
            return false;
        }
        self.common_names.insert(common.to_string());

        let cultivar = cultivar_name.trim();
        if !cultivar.is_empty() {
            self.cultivars
                .entry(common.to_string())
                .or_default()
                .insert(cultivar.to_string());
        }
        true
    }
}

fn write_csv(path: &Path, df: PolarsResult<DataFrame>) -> Result<(), LoadError> {
    let csv_error = |source: PolarsError| LoadError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut df = df.map_err(csv_error)?;
    let mut file = File::create(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(csv_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::types::MatchStatus;

    #[test]
    fn test_only_confident_results_harvested() {
        let mut harvest = VocabularyHarvest::new();
        assert!(harvest.add_result(&ParseResult::new("Kale", "Red Russian", "", MatchStatus::Matched)));
        assert!(harvest.add_result(&ParseResult::new("Kale", "Lacinato", "", MatchStatus::SpecialCase)));
        assert!(!harvest.add_result(&ParseResult::new("Spicy Mix", "", "", MatchStatus::Unmatched)));

        assert_eq!(harvest.common_names().collect::<Vec<_>>(), vec!["Kale"]);
        assert_eq!(
            harvest.cultivars().collect::<Vec<_>>(),
            vec![("Kale", "Lacinato"), ("Kale", "Red Russian")]
        );
    }

    #[test]
    fn test_legacy_records_need_known_name() {
        let vocab = Vocabulary::from_config(&ParserConfig::builtin());
        let mut harvest = VocabularyHarvest::new();
        assert!(harvest.add_legacy("chard", "Bright Lights", &vocab));
        assert!(!harvest.add_legacy("Triffid", "Giant", &vocab));
        assert_eq!(harvest.cultivars().collect::<Vec<_>>(), vec![("Swiss Chard", "Bright Lights")]);
    }

    #[test]
    fn test_write_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut harvest = VocabularyHarvest::new();
        harvest.add_result(&ParseResult::new("Radish", "Daikon", "", MatchStatus::Matched));
        harvest.add_result(&ParseResult::new("Beet", "Bull's Blood", "", MatchStatus::Matched));
        harvest.write_csvs(dir.path()).unwrap();

        let names = crate::vocabulary::load_common_names_csv(&dir.path().join(COMMON_NAMES_FILE)).unwrap();
        assert_eq!(names, vec!["Beet".to_string(), "Radish".to_string()]);

        let rows = crate::vocabulary::load_cultivars_csv(&dir.path().join(CULTIVARS_FILE)).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.contains(&("Beet".to_string(), "Bull's Blood".to_string())));
    }
}
