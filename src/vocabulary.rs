//! Vocabulary Registry
//!
//! Known common names, the name-equivalence map, preserve-exact cultivars and
//! known cultivars grouped by common name. Built once and read-only afterwards.
//!
//! Data sources (all optional):
//! - `common_names.csv`: one name per row, header `common_name`
//! - `cultivars.csv`: `common_name,cultivar_name` rows
//!
//! A missing or unreadable source is not an error: the registry falls back to
//! the configured default names and logs a warning.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::ParserConfig;
use crate::error::LoadError;
use crate::utils::normalization::{collapse_whitespace, title_case_words};

pub const COMMON_NAMES_FILE: &str = "common_names.csv";
pub const CULTIVARS_FILE: &str = "cultivars.csv";

const COMMON_NAME_COLUMN: &str = "common_name";
const CULTIVAR_NAME_COLUMN: &str = "cultivar_name";

/// Immutable registry of common names and cultivar spellings
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    /// Canonical display names, alphabetical
    names: Vec<String>,

    /// Lowercase name -> index into `names`
    name_index: FxHashMap<String, usize>,

    /// Lowercase literal -> canonical display name
    equivalents: FxHashMap<String, String>,

    /// Cultivars whose stored spelling always wins
    preserve_exact: Vec<String>,

    /// Lowercase, whitespace-collapsed cultivar -> index into `preserve_exact`
    preserve_index: FxHashMap<String, usize>,

    /// Canonical common name -> known cultivars (sorted, unique)
    cultivars: FxHashMap<String, Vec<String>>,
}

impl Vocabulary {
    /// Build a registry from explicit common names plus the config's
    /// equivalents and preserve-exact cultivars.
    pub fn new<I, S>(names: I, config: &ParserConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::default();

        for name in names {
            vocab.insert_name(name.as_ref());
        }

        for (literal, canonical) in &config.name_equivalents {
            let literal = collapse_whitespace(&literal.to_lowercase());
            let canonical = collapse_whitespace(canonical);
            if literal.is_empty() || canonical.is_empty() {
                continue;
            }
            // Canonical targets must themselves be known names
            vocab.insert_name(&canonical);
            vocab.equivalents.insert(literal, canonical);
        }

        for cultivar in &config.preserve_exact_cultivars {
            vocab.insert_preserved(cultivar);
        }

        vocab.names.sort();
        vocab.reindex_names();
        vocab
    }

    /// Registry from the config's default common names only.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(&config.default_common_names, config)
    }

    /// Load registry data from optional CSV sources.
    ///
    /// Falls back to `config.default_common_names` when the common-name source
    /// is absent, unreadable or empty. An unreadable cultivar source only
    /// reduces coverage.
    pub fn load(config: &ParserConfig, common_names: Option<&Path>, cultivars: Option<&Path>) -> Self {
        let names = match common_names {
            Some(path) => match load_common_names_csv(path) {
                Ok(names) if !names.is_empty() => {
                    tracing::info!("Loaded {} common names from {:?}", names.len(), path);
                    names
                }
                Ok(_) => {
                    tracing::warn!("No common names in {:?}, using {} defaults", path, config.default_common_names.len());
                    config.default_common_names.clone()
                }
                Err(e) => {
                    tracing::warn!("{}; using {} default common names", e, config.default_common_names.len());
                    config.default_common_names.clone()
                }
            },
            None => {
                tracing::debug!("Using {} default common names", config.default_common_names.len());
                config.default_common_names.clone()
            }
        };

        let mut vocab = Self::new(&names, config);

        if let Some(path) = cultivars {
            match load_cultivars_csv(path) {
                Ok(rows) => {
                    tracing::info!("Loaded {} cultivar records from {:?}", rows.len(), path);
                    vocab.add_cultivars(rows);
                }
                Err(e) => tracing::warn!("{}; continuing without known cultivars", e),
            }
        }

        vocab
    }

    /// Load `common_names.csv` and `cultivars.csv` from a directory when present.
    pub fn from_data_dir(config: &ParserConfig, dir: &Path) -> Self {
        let common_names = existing(dir.join(COMMON_NAMES_FILE));
        let cultivars = existing(dir.join(CULTIVARS_FILE));
        Self::load(config, common_names.as_deref(), cultivars.as_deref())
    }

    /// Record known cultivars. Each also becomes a preserve-exact spelling.
    pub fn add_cultivars<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (common, cultivar) in rows {
            let cultivar = cultivar.trim();
            if cultivar.is_empty() {
                continue;
            }
            let common = self
                .canonical_name(&common)
                .unwrap_or_else(|| title_case_words(&common));

            self.insert_preserved(cultivar);

            let list = self.cultivars.entry(common).or_default();
            if !list.iter().any(|c| c == cultivar) {
                list.push(cultivar.to_string());
                list.sort();
            }
        }
    }

    /// Canonical names, alphabetical
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Case-insensitive membership test against names and equivalence keys
    pub fn contains(&self, name: &str) -> bool {
        self.canonical_name(name).is_some()
    }

    /// Every literal the matcher looks for: names plus equivalence keys (lowercase)
    pub fn match_literals(&self) -> Vec<String> {
        let mut literals: FxHashSet<String> = self.name_index.keys().cloned().collect();
        literals.extend(self.equivalents.keys().cloned());
        literals.into_iter().collect()
    }

    /// Resolve a literal to its canonical display name.
    ///
    /// Equivalents win over plain names, so "chard" resolves to "Swiss Chard".
    pub fn canonical_name(&self, literal: &str) -> Option<String> {
        let key = collapse_whitespace(&literal.to_lowercase());
        if let Some(canonical) = self.equivalents.get(&key) {
            return Some(canonical.clone());
        }
        self.name_index.get(&key).map(|&idx| self.names[idx].clone())
    }

    pub fn equivalents(&self) -> &FxHashMap<String, String> {
        &self.equivalents
    }

    pub fn preserve_exact(&self) -> &[String] {
        &self.preserve_exact
    }

    /// Stored spelling of a preserve-exact cultivar matching `candidate`.
    ///
    /// Comparison ignores case and whitespace runs; the returned text is the
    /// stored one, inner spacing included.
    pub fn preserved_spelling(&self, candidate: &str) -> Option<&str> {
        let key = preserve_key(candidate);
        self.preserve_index
            .get(&key)
            .map(|&idx| self.preserve_exact[idx].as_str())
    }

    /// Known cultivars for a common name (any casing or equivalent literal)
    pub fn cultivars_for(&self, common_name: &str) -> &[String] {
        self.canonical_name(common_name)
            .and_then(|canonical| self.cultivars.get(&canonical))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cultivars(&self) -> &FxHashMap<String, Vec<String>> {
        &self.cultivars
    }

    fn insert_name(&mut self, raw: &str) {
        let name = collapse_whitespace(raw);
        if name.is_empty() {
            return;
        }
        let key = name.to_lowercase();
        if self.name_index.contains_key(&key) {
            return;
        }
        // CSV sources are often lowercase; display names are title case
        let display = if name == key { title_case_words(&name) } else { name };
        self.name_index.insert(key, self.names.len());
        self.names.push(display);
    }

    fn reindex_names(&mut self) {
        self.name_index = self
            .names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.to_lowercase(), idx))
            .collect();
    }

    fn insert_preserved(&mut self, raw: &str) {
        let cultivar = raw.trim();
        if cultivar.is_empty() {
            return;
        }
        let key = preserve_key(cultivar);
        if self.preserve_index.contains_key(&key) {
            return;
        }
        self.preserve_index.insert(key, self.preserve_exact.len());
        self.preserve_exact.push(cultivar.to_string());
    }
}

fn preserve_key(text: &str) -> String {
    collapse_whitespace(&text.to_lowercase())
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

// ============================================================================
// CSV LOADERS
// ============================================================================

/// Read a CSV with every column as a string.
///
/// Rows with extra fields are cut to the header width and short rows read as
/// nulls, so one bad row never drops the rest of the file.
fn read_string_csv(path: &Path) -> Result<DataFrame, LoadError> {
    let parse_options = CsvParseOptions::default().with_truncate_ragged_lines(true);

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_ignore_errors(true)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn string_column<'a>(df: &'a DataFrame, name: &str, path: &Path) -> Result<&'a StringChunked, LoadError> {
    let column = df.column(name).map_err(|_| LoadError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
    })?;
    column.str().map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Load common names from a one-column CSV.
///
/// The `common_name` column is used when present. Otherwise the first column
/// is used and its header, which is then a name rather than a header, is kept.
pub fn load_common_names_csv(path: &Path) -> Result<Vec<String>, LoadError> {
    let df = read_string_csv(path)?;

    let mut names = Vec::new();
    let column_name = if df.get_column_names().iter().any(|c| c.as_str() == COMMON_NAME_COLUMN) {
        COMMON_NAME_COLUMN.to_string()
    } else {
        let first = df.get_column_names().first().map(|c| c.to_string()).ok_or_else(|| {
            LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: COMMON_NAME_COLUMN.to_string(),
            }
        })?;
        names.push(first.trim().to_string());
        first
    };

    let values = string_column(&df, &column_name, path)?;
    let mut skipped = 0usize;
    for value in values.into_iter() {
        match value.map(str::trim) {
            Some(name) if !name.is_empty() => names.push(name.to_string()),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!("Skipped {} empty or unreadable rows in {:?}", skipped, path);
    }

    names.retain(|n| !n.is_empty());
    Ok(names)
}

/// Load `(common_name, cultivar_name)` pairs.
pub fn load_cultivars_csv(path: &Path) -> Result<Vec<(String, String)>, LoadError> {
    let df = read_string_csv(path)?;
    let commons = string_column(&df, COMMON_NAME_COLUMN, path)?;
    let cultivars = string_column(&df, CULTIVAR_NAME_COLUMN, path)?;

    let mut rows = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for idx in 0..df.height() {
        match (commons.get(idx), cultivars.get(idx)) {
            (Some(common), Some(cultivar)) if !common.trim().is_empty() && !cultivar.trim().is_empty() => {
                rows.push((common.trim().to_string(), cultivar.trim().to_string()));
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!("Skipped {} incomplete rows in {:?}", skipped, path);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config() -> ParserConfig {
        ParserConfig::builtin()
    }

    #[test]
    fn test_equivalent_targets_are_names() {
        let vocab = Vocabulary::from_config(&config());
        for canonical in vocab.equivalents().values() {
            assert!(
                vocab.names().iter().any(|n| n == canonical),
                "equivalent target missing from names: {}",
                canonical
            );
        }
    }

    #[test]
    fn test_canonical_name_resolution() {
        let vocab = Vocabulary::from_config(&config());
        assert_eq!(vocab.canonical_name("CHARD").as_deref(), Some("Swiss Chard"));
        assert_eq!(vocab.canonical_name("green  pea").as_deref(), Some("Pea"));
        assert_eq!(vocab.canonical_name("mung bean").as_deref(), Some("Mung Bean"));
        assert_eq!(vocab.canonical_name("triffid"), None);
    }

    #[test]
    fn test_lowercase_names_are_title_cased() {
        let vocab = Vocabulary::new(["bok choy", "Kale", "kale"], &ParserConfig::empty());
        assert_eq!(vocab.names(), &["Bok Choy".to_string(), "Kale".to_string()]);
    }

    #[test]
    fn test_preserved_spelling() {
        let vocab = Vocabulary::from_config(&config());
        assert_eq!(vocab.preserved_spelling("bull's blood"), Some("Bull's Blood"));
        assert_eq!(
            vocab.preserved_spelling("usda certified black oil"),
            Some("USDA Certified  Black Oil")
        );
        assert_eq!(vocab.preserved_spelling("Red Russian"), None);
    }

    #[test]
    fn test_load_common_names_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(COMMON_NAMES_FILE);
        fs::write(&path, "common_name\nKale\n\n  Forage Pea  \nRadish\n").unwrap();

        let names = load_common_names_csv(&path).unwrap();
        assert_eq!(names, vec!["Kale", "Forage Pea", "Radish"]);
    }

    #[test]
    fn test_load_common_names_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(COMMON_NAMES_FILE);
        fs::write(&path, "Kale\nRadish\n").unwrap();

        let names = load_common_names_csv(&path).unwrap();
        assert_eq!(names, vec!["Kale", "Radish"]);
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let config = config();
        let missing = Path::new("/nonexistent/common_names.csv");
        let vocab = Vocabulary::load(&config, Some(missing), None);
        assert_eq!(vocab.len(), Vocabulary::from_config(&config).len());
        assert!(vocab.contains("Mung Bean"));
    }

    #[test]
    fn test_cultivars_join_preserve_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CULTIVARS_FILE);
        fs::write(
            &path,
            "common_name,cultivar_name\nkale,Red Russian\nKale,Dwarf Siberian\nchard,Bright Lights\nRadish,\n",
        )
        .unwrap();

        let vocab = Vocabulary::load(&config(), None, Some(&path));
        assert_eq!(vocab.cultivars_for("Kale"), &["Dwarf Siberian".to_string(), "Red Russian".to_string()]);
        assert_eq!(vocab.cultivars_for("swiss chard"), &["Bright Lights".to_string()]);
        assert_eq!(vocab.preserved_spelling("RED RUSSIAN"), Some("Red Russian"));
        assert!(vocab.cultivars_for("Radish").is_empty());
    }

    #[test]
    fn test_cultivars_csv_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CULTIVARS_FILE);
        fs::write(&path, "name\nKale\n").unwrap();

        assert!(matches!(
            load_cultivars_csv(&path),
            Err(LoadError::MissingColumn { .. })
        ));
    }
}
