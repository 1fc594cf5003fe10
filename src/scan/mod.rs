//! Key Occurrence Scanner.
//!
//! Scans buffer text line by line for locale-key usages that the active
//! map can resolve. Matching is purely textual, so any file type the
//! project mixes (JS, HTML templates, inline scripts) scans the same way.

pub mod occurrence;
pub mod rules;

pub use occurrence::{KeyOccurrence, MatchRule};
pub use rules::RuleSet;

use crate::locale::LocaleMap;

/// Scan a whole buffer, producing occurrences in line order.
pub fn scan_buffer(text: &str, map: &LocaleMap, rules: &RuleSet) -> Vec<KeyOccurrence> {
    text.lines()
        .enumerate()
        .flat_map(|(index, line)| rules.scan_line(line, index + 1, map))
        .collect()
}

/// Whether a file name identifies a locale resource module. Resource
/// buffers are scanned for definitions only, never annotated as usages.
pub fn is_resource_module(file_name: &str, resource_file_names: &[String]) -> bool {
    let lower = file_name.to_lowercase();
    resource_file_names
        .iter()
        .any(|name| lower.ends_with(&name.to_lowercase()))
}
