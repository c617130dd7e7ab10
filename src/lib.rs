//! Seed Title Parser
//!
//! Turns free-form seed and microgreen product titles into structured
//! records: common name, cultivar name and leftover descriptors.
//!
//! Layout:
//! - `config`: JSON parser configuration (ignore terms, equivalents, overrides)
//! - `vocabulary`: known common names and cultivars, loaded with Polars
//! - `special_cases`: exact-title overrides
//! - `pipeline/`: matcher, cultivar extractor and descriptor cleaner
//! - `parser`: the coordinator and the shared default parser
//! - `compat`: legacy field names
//! - `harvest`: write parsed names back out as vocabulary CSVs
//! - `utils/`: normalization and display formatting
//!
//! ```no_run
//! let result = seed_title_parser::parse_title("Kale, Red Russian - Organic");
//! assert_eq!(result.formatted(), "Kale 'Red Russian'");
//! ```

pub mod compat;
pub mod config;
pub mod error;
pub mod harvest;
pub mod parser;
pub mod pipeline;
pub mod special_cases;
pub mod types;
pub mod utils;
pub mod vocabulary;

// Re-export commonly used types
pub use compat::LegacyRecord;
pub use config::{ParserConfig, SpecialCaseEntry};
pub use error::LoadError;
pub use harvest::VocabularyHarvest;
pub use parser::{default_parser, parse_title, parse_with_legacy_fields, SeedTitleParser};
pub use pipeline::CultivarRule;
pub use special_cases::SpecialCaseTable;
pub use types::{MatchStatus, ParseResult};
pub use utils::format_name;
pub use vocabulary::Vocabulary;
