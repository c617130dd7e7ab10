//! Display name formatting
//!
//! Horticultural convention: `Common Name 'Cultivar Name'`, with any extra
//! descriptors appended after the quoted cultivar.

/// Format a seed name for display
///
/// Returns: "Common 'Cultivar' descriptors", "Common descriptors" or "Common".
/// An empty common name yields an empty string. A cultivar that already
/// carries surrounding single quotes is not quoted again.
pub fn format_name(common_name: &str, cultivar_name: &str, descriptors: Option<&str>) -> String {
    let common = common_name.trim();
    if common.is_empty() {
        return String::new();
    }

    let mut formatted = common.to_string();

    let cultivar = cultivar_name.trim();
    if !cultivar.is_empty() {
        formatted.push(' ');
        if is_single_quoted(cultivar) {
            formatted.push_str(cultivar);
        } else {
            formatted.push('\'');
            formatted.push_str(cultivar);
            formatted.push('\'');
        }
    }

    if let Some(extra) = descriptors.map(str::trim).filter(|d| !d.is_empty()) {
        formatted.push(' ');
        formatted.push_str(extra);
    }

    formatted
}

fn is_single_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'')
}
