//! Parser Configuration
//!
//! Everything the parser treats as data rather than code: ignore terms, name
//! equivalents, preserve-exact cultivars, special cases and the fallback
//! common-name list. Stored as JSON so it can be edited without rebuilding;
//! the built-in copy is compiled in from `data/parser_config.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

const BUILTIN_CONFIG: &str = include_str!("../data/parser_config.json");

/// Residual text longer than this many words is treated as descriptors.
pub const DEFAULT_MAX_RESIDUAL_WORDS: usize = 3;

fn default_max_residual_words() -> usize {
    DEFAULT_MAX_RESIDUAL_WORDS
}

/// One exact-title override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialCaseEntry {
    /// Title key; normalized with `plain_key` when the table is built
    pub key: String,
    pub common_name: String,
    #[serde(default)]
    pub cultivar_name: String,
    #[serde(default)]
    pub additional_descriptors: String,
}

/// Static parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(default = "default_max_residual_words")]
    pub max_residual_words: usize,

    /// Noise terms removed before matching (lowercase)
    #[serde(default)]
    pub ignore_terms: Vec<String>,

    /// Common names used when no `common_names.csv` is available
    #[serde(default)]
    pub default_common_names: Vec<String>,

    /// Lowercase literal -> canonical common name
    #[serde(default)]
    pub name_equivalents: BTreeMap<String, String>,

    /// Cultivars emitted with their stored casing and punctuation
    #[serde(default)]
    pub preserve_exact_cultivars: Vec<String>,

    /// Ordered exact-title overrides
    #[serde(default)]
    pub special_cases: Vec<SpecialCaseEntry>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ParserConfig {
    /// Configuration compiled into the crate.
    ///
    /// The embedded JSON is covered by tests; should it ever fail to parse,
    /// the parser still runs with an empty configuration.
    pub fn builtin() -> Self {
        match serde_json::from_str(BUILTIN_CONFIG) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Built-in parser config is invalid: {}", e);
                Self::empty()
            }
        }
    }

    /// Configuration with no terms, names or overrides.
    pub fn empty() -> Self {
        Self {
            max_residual_words: DEFAULT_MAX_RESIDUAL_WORDS,
            ignore_terms: Vec::new(),
            default_common_names: Vec::new(),
            name_equivalents: BTreeMap::new(),
            preserve_exact_cultivars: Vec::new(),
            special_cases: Vec::new(),
        }
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| LoadError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from a JSON file, falling back to the built-in copy
    /// when the file is missing or invalid.
    pub fn load_or_builtin(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No parser config at {:?}, using built-in", path);
            return Self::builtin();
        }

        match Self::load(path) {
            Ok(config) => {
                tracing::info!(
                    "Loaded parser config from {:?} ({} ignore terms, {} special cases)",
                    path,
                    config.ignore_terms.len(),
                    config.special_cases.len()
                );
                config
            }
            Err(e) => {
                tracing::warn!("{}; using built-in parser config", e);
                Self::builtin()
            }
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
