//! Title parsing stages
//!
//! - matcher: locate the common name
//! - cultivar: isolate the cultivar around it
//! - descriptors: tidy whatever is left

pub mod cultivar;
pub mod descriptors;
pub mod matcher;

pub use cultivar::{CultivarExtractor, CultivarRule, Extraction};
pub use descriptors::clean_descriptors;
pub use matcher::{CommonNameMatcher, NameMatch};
