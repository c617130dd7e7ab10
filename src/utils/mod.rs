//! Utility modules for title parsing
//!
//! Contains shared functionality used across the pipeline stages:
//! - Normalization: whitespace, keys, word-boundary patterns, ignore terms
//! - Display name: `Common 'Cultivar' descriptors` formatting

pub mod display_name;
pub mod normalization;

// Re-export commonly used items
pub use display_name::format_name;
pub use normalization::{plain_key, IgnoreTerms, KEY_NORMALIZATION_VERSION};
