//! The resolved key-to-text mapping for one merged set of resource files.
//!
//! A `LocaleMap` is immutable once built. The store replaces the whole map
//! behind an `Arc` when resource files change, so an in-flight scan keeps
//! reading the snapshot it started with.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Shape of a locale key: `l` or `L` followed by at least four digits.
static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[lL]\d{4,}$").expect("key pattern is valid"));

/// Returns true if `text` has the `lDDDD` key shape.
pub fn is_locale_key(text: &str) -> bool {
    KEY_RE.is_match(text)
}

/// Immutable mapping from locale key to display text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleMap {
    entries: HashMap<String, String>,
    /// Lowercased key -> original key, for case-insensitive fallback lookup.
    lower: HashMap<String, String>,
}

impl LocaleMap {
    /// Build a map from `(key, text)` pairs. Later pairs overwrite earlier
    /// ones for the same key. Keys that do not have the locale-key shape are
    /// dropped silently.
    pub fn from_entries<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = HashMap::new();
        for (key, text) in pairs {
            let key = key.into();
            if is_locale_key(&key) {
                entries.insert(key, text.into());
            }
        }
        let lower = entries
            .keys()
            .map(|k| (k.to_lowercase(), k.clone()))
            .collect();
        Self { entries, lower }
    }

    /// The built-in sample map, used only when no resource file yields data.
    pub fn builtin_defaults() -> Self {
        Self::from_entries([
            ("l0359", "检验检查"),
            ("l0360", "化验单"),
            ("l1001", "患者信息"),
            ("l1002", "诊断报告"),
            ("l1003", "医嘱"),
            ("l1004", "处方"),
            ("l1005", "手术记录"),
            ("l1006", "随访计划"),
        ])
    }

    /// Merge maps in order; later maps overwrite earlier ones on key conflict.
    pub fn merge<I>(maps: I) -> Self
    where
        I: IntoIterator<Item = LocaleMap>,
    {
        let mut entries = HashMap::new();
        for map in maps {
            entries.extend(map.entries);
        }
        Self::from_entries(entries)
    }

    /// Look up a key, falling back to a case-insensitive match when the
    /// exact-case key is absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(text) = self.entries.get(key) {
            return Some(text);
        }
        self.lower
            .get(&key.to_lowercase())
            .and_then(|original| self.entries.get(original))
            .map(String::as_str)
    }

    /// Exact or case-insensitive membership check.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::locale::map::*;

    #[test]
    fn test_is_locale_key() {
        assert!(is_locale_key("l0001"));
        assert!(is_locale_key("L0359"));
        assert!(is_locale_key("l12345"));
        assert!(!is_locale_key("l001")); // too few digits
        assert!(!is_locale_key("x0001"));
        assert!(!is_locale_key("l0001x"));
        assert!(!is_locale_key(""));
    }

    #[test]
    fn test_from_entries_drops_non_key_shapes() {
        let map = LocaleMap::from_entries([("l0001", "Search"), ("name", "zhCn")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("l0001"), Some("Search"));
        assert_eq!(map.get("name"), None);
    }

    #[test]
    fn test_later_pairs_overwrite() {
        let map = LocaleMap::from_entries([("l0001", "old"), ("l0001", "new")]);
        assert_eq!(map.get("l0001"), Some("new"));
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let map = LocaleMap::from_entries([("l0001", "Search")]);
        assert_eq!(map.get("l0001"), Some("Search"));
        assert_eq!(map.get("L0001"), Some("Search"));
        assert!(map.contains_key("L0001"));
        assert!(!map.contains_key("l0002"));
    }

    #[test]
    fn test_merge_precedence() {
        let first = LocaleMap::from_entries([("l0001", "first"), ("l0002", "only")]);
        let second = LocaleMap::from_entries([("l0001", "second")]);
        let merged = LocaleMap::merge([first, second]);
        assert_eq!(merged.get("l0001"), Some("second"));
        assert_eq!(merged.get("l0002"), Some("only"));
    }

    #[test]
    fn test_builtin_defaults() {
        let map = LocaleMap::builtin_defaults();
        assert!(!map.is_empty());
        assert_eq!(map.get("l0359"), Some("检验检查"));
    }
}
