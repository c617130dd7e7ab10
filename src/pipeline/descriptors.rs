//! Descriptor Cleaner
//!
//! Turns the leftover text of a title (after the common name and cultivar
//! have been blanked out) into a tidy descriptor string.

use crate::utils::normalization::IgnoreTerms;

/// Characters dropped from the edges of each leftover token
const STRAY: &[char] = &[
    ',', ';', ':', '(', ')', '[', ']', '\'', '"', '‘', '’', '“', '”', '-', '–', '—',
];

/// Clean leftover title text into space-joined descriptor words.
///
/// Ignore terms are removed again (they may have been glued to punctuation
/// that has since been blanked), stray separators and brackets are dropped,
/// and whitespace collapses to single spaces. May return an empty string.
pub fn clean_descriptors(remainder: &str, ignore: &IgnoreTerms) -> String {
    let stripped = ignore.remove(remainder);

    stripped
        .split_whitespace()
        .map(|token| token.trim_matches(STRAY))
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ignore() -> IgnoreTerms {
        IgnoreTerms::new(&["organic", "seeds", "heirloom"])
    }

    #[test]
    fn test_clean_descriptors() {
        assert_eq!(clean_descriptors("           (USA)", &ignore()), "USA");
        assert_eq!(clean_descriptors(" ,  - 1 lb Bag", &ignore()), "1 lb Bag");
        assert_eq!(clean_descriptors("(Organic, Heirloom)", &ignore()), "");
        assert_eq!(clean_descriptors("", &ignore()), "");
    }

    #[test]
    fn test_inner_punctuation_kept() {
        assert_eq!(
            clean_descriptors("  (2.5 oz) Non-GMO", &ignore()),
            "2.5 oz Non-GMO"
        );
    }
}
