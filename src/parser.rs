//! Seed Title Parser - main coordinator for title parsing
//!
//! Runs the stages in order:
//! 1. Special-case table (exact-title overrides)
//! 2. Ignore-term filter
//! 3. Common-name matcher
//! 4. Cultivar extractor
//! 5. Descriptor cleaner
//!
//! A `SeedTitleParser` is immutable once built and can be shared across
//! threads. The process-wide default lives behind a `LazyLock`.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use rayon::prelude::*;

use crate::compat::LegacyRecord;
use crate::config::ParserConfig;
use crate::pipeline::{clean_descriptors, CommonNameMatcher, CultivarExtractor};
use crate::special_cases::SpecialCaseTable;
use crate::types::{MatchStatus, ParseResult};
use crate::utils::normalization::{
    blank_ranges, collapse_whitespace, parenthetical_ranges, IgnoreTerms,
};
use crate::vocabulary::Vocabulary;

/// Environment variable naming the data directory of the default parser
pub const DATA_DIR_ENV: &str = "SEED_PARSER_DATA_DIR";

/// Config file looked up inside a data directory
pub const CONFIG_FILE: &str = "parser_config.json";

static DEFAULT_PARSER: LazyLock<SeedTitleParser> = LazyLock::new(SeedTitleParser::from_env);

/// Shared read-only parser used by the free functions
pub fn default_parser() -> &'static SeedTitleParser {
    &DEFAULT_PARSER
}

/// Parse a title with the default parser.
pub fn parse_title(raw_title: &str) -> ParseResult {
    default_parser().parse_title(raw_title)
}

/// Parse a title with the default parser and wrap it for legacy callers.
pub fn parse_with_legacy_fields(raw_title: &str) -> LegacyRecord {
    default_parser().parse_with_legacy_fields(raw_title)
}

/// Title parser over an injected vocabulary and configuration
#[derive(Debug, Clone)]
pub struct SeedTitleParser {
    config: ParserConfig,
    vocabulary: Vocabulary,
    ignore: IgnoreTerms,
    special_cases: SpecialCaseTable,
    matcher: CommonNameMatcher,
    extractor: CultivarExtractor,
}

impl SeedTitleParser {
    pub fn new(config: ParserConfig, vocabulary: Vocabulary) -> Self {
        let ignore = IgnoreTerms::new(&config.ignore_terms);
        let special_cases = SpecialCaseTable::new(&config.special_cases);
        let matcher = CommonNameMatcher::new(&vocabulary);
        let extractor = CultivarExtractor::new(config.max_residual_words);

        tracing::debug!(
            "Parser ready: {} names, {} match literals, {} ignore terms, {} special cases",
            vocabulary.len(),
            matcher.len(),
            ignore.terms().len(),
            special_cases.len()
        );

        Self {
            config,
            vocabulary,
            ignore,
            special_cases,
            matcher,
            extractor,
        }
    }

    /// Parser over the configuration and default names compiled into the crate.
    pub fn builtin() -> Self {
        let config = ParserConfig::builtin();
        let vocabulary = Vocabulary::from_config(&config);
        Self::new(config, vocabulary)
    }

    /// Parser over `parser_config.json`, `common_names.csv` and `cultivars.csv`
    /// in `dir`. Each missing file falls back to its built-in counterpart.
    pub fn from_data_dir(dir: &Path) -> Self {
        let config = ParserConfig::load_or_builtin(&dir.join(CONFIG_FILE));
        let vocabulary = Vocabulary::from_data_dir(&config, dir);
        tracing::info!(
            "Seed title parser loaded from {:?}: {} common names",
            dir,
            vocabulary.len()
        );
        Self::new(config, vocabulary)
    }

    /// Parser for the data directory in `SEED_PARSER_DATA_DIR`, else built-in.
    pub fn from_env() -> Self {
        match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::from_data_dir(&PathBuf::from(dir)),
            _ => Self::builtin(),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn special_cases(&self) -> &SpecialCaseTable {
        &self.special_cases
    }

    pub fn ignore_terms(&self) -> &IgnoreTerms {
        &self.ignore
    }

    /// Parse one raw product title. Never fails.
    pub fn parse_title(&self, raw_title: &str) -> ParseResult {
        if raw_title.trim().is_empty() {
            return ParseResult::empty();
        }

        if let Some(hit) = self.special_cases.lookup(raw_title, &self.ignore) {
            tracing::debug!("Special case hit for '{}'", raw_title);
            return hit.clone();
        }

        let filtered = self.ignore.strip(raw_title);
        if filtered.is_empty() {
            // Nothing but ignore terms; keep the title so the record is not blank
            tracing::debug!("Title '{}' reduced to nothing by ignore terms", raw_title);
            return ParseResult::new(
                collapse_whitespace(raw_title),
                "",
                "",
                MatchStatus::Unmatched,
            );
        }

        let masked = blank_ranges(&filtered, &parenthetical_ranges(&filtered));

        // Prefer a name outside parentheses; fall back to one inside them
        let (found, cultivar_text) = match self.matcher.find(&masked) {
            Some(found) => (found, masked.as_str()),
            None => match self.matcher.find(&filtered) {
                Some(found) => (found, filtered.as_str()),
                None => {
                    tracing::debug!("No common name in '{}'", filtered);
                    return ParseResult::new(filtered, "", "", MatchStatus::Unmatched);
                }
            },
        };

        let extraction = self.extractor.extract(
            &filtered,
            cultivar_text,
            found.span.clone(),
            &self.vocabulary,
        );
        let descriptors = clean_descriptors(&extraction.remainder, &self.ignore);

        tracing::debug!(
            "'{}' -> common '{}' via '{}', cultivar '{}' ({:?}), descriptors '{}'",
            raw_title,
            found.canonical,
            found.literal,
            extraction.cultivar,
            extraction.rule,
            descriptors
        );

        ParseResult::new(
            found.canonical,
            extraction.cultivar,
            descriptors,
            MatchStatus::Matched,
        )
    }

    /// Parse one title into a record carrying both field-name conventions.
    pub fn parse_with_legacy_fields(&self, raw_title: &str) -> LegacyRecord {
        LegacyRecord::new(self.parse_title(raw_title))
    }

    /// Parse a batch in parallel; output order matches input order.
    pub fn parse_many<S>(&self, titles: &[S]) -> Vec<ParseResult>
    where
        S: AsRef<str> + Sync,
    {
        titles
            .par_iter()
            .map(|title| self.parse_title(title.as_ref()))
            .collect()
    }
}

impl Default for SeedTitleParser {
    fn default() -> Self {
        Self::builtin()
    }
}
