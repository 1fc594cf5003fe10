//! Line-oriented matching rules for key occurrences.
//!
//! The precise definition-shaped rule runs first on each line; when it
//! matches, no general rule runs for that line, so a resource definition
//! is never double-reported as a usage. Every candidate is gated on map
//! membership (with a case-insensitive fallback), so unknown key-shaped
//! tokens are never reported.

use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::locale::LocaleMap;
use crate::scan::occurrence::{KeyOccurrence, MatchRule};

const KEY_PATTERN: &str = r"[lL]\d{4,}";

/// Definition-shaped `'lDDDD': '...'` pair.
static PRECISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"]?([lL]\d{4,})['"]?\s*:\s*(?:'[^']*'|"[^"]*")"#).expect("valid pattern")
});

static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"]([lL]\d{4,})['"]"#).expect("valid pattern"));

static BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[lL]\d{4,}\b").expect("valid pattern"));

static INTERPOLATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([lL]\d{4,})\s*\}\}").expect("valid pattern"));

/// Compiled general rules, built from the configured prefixes and
/// attribute names.
pub struct RuleSet {
    general: Vec<(MatchRule, Regex)>,
}

impl RuleSet {
    pub fn new(key_prefixes: &[String], attribute_names: &[String]) -> Result<Self> {
        let mut general = Vec::new();

        if !key_prefixes.is_empty() {
            let prefixes = alternation(key_prefixes);
            general.push((
                MatchRule::PropertyAccess,
                compile(
                    &format!(r#"(?:{prefixes})\[\s*['"]({KEY_PATTERN})['"]\s*\]"#),
                    "bracket access",
                )?,
            ));
            general.push((
                MatchRule::PropertyAccess,
                compile(
                    &format!(r"(?:{prefixes})\.({KEY_PATTERN})\b"),
                    "dot access",
                )?,
            ));
            general.push((
                MatchRule::CallLookup,
                compile(
                    &format!(r#"(?:{prefixes})\(\s*['"]({KEY_PATTERN})['"]"#),
                    "call lookup",
                )?,
            ));
        }

        if !attribute_names.is_empty() {
            let names = alternation(attribute_names);
            general.push((
                MatchRule::AttributeBinding,
                compile(
                    &format!(r#"(?:^|[\s<])(?:{names})\s*=\s*['"]({KEY_PATTERN})['"]"#),
                    "attribute binding",
                )?,
            ));
        }

        general.push((MatchRule::Interpolation, INTERPOLATION_RE.clone()));
        general.push((MatchRule::QuotedLiteral, QUOTED_RE.clone()));

        Ok(Self { general })
    }

    /// Scan one line. `line_no` is 1-based and carried into the output.
    pub fn scan_line(&self, line: &str, line_no: usize, map: &LocaleMap) -> Vec<KeyOccurrence> {
        let mut occurrences = Vec::new();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        // Precise rule first: a definition line yields only pair matches.
        for caps in PRECISE_RE.captures_iter(line) {
            let Some(group) = caps.get(1) else {
                continue;
            };
            push_occurrence(
                &mut occurrences,
                &mut seen,
                line,
                line_no,
                group.as_str(),
                group.start(),
                group.end(),
                MatchRule::KeyValuePair,
                map,
            );
        }
        if !occurrences.is_empty() {
            return occurrences;
        }

        for (rule, re) in &self.general {
            for caps in re.captures_iter(line) {
                let Some(group) = caps.get(1) else {
                    continue;
                };
                push_occurrence(
                    &mut occurrences,
                    &mut seen,
                    line,
                    line_no,
                    group.as_str(),
                    group.start(),
                    group.end(),
                    *rule,
                    map,
                );
            }
        }

        for found in BARE_RE.find_iter(line) {
            if !is_bare_use(line, found.start(), found.end()) {
                continue;
            }
            push_occurrence(
                &mut occurrences,
                &mut seen,
                line,
                line_no,
                found.as_str(),
                found.start(),
                found.end(),
                MatchRule::BareIdentifier,
                map,
            );
        }

        occurrences
    }
}

fn alternation(items: &[String]) -> String {
    items
        .iter()
        .map(|item| regex::escape(item))
        .collect::<Vec<_>>()
        .join("|")
}

fn compile(pattern: &str, what: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("invalid {what} pattern: {pattern}"))
}

/// Reject bare tokens that sit in definition or assignment position, or
/// directly inside quotes (those belong to other rules).
fn is_bare_use(line: &str, start: usize, end: usize) -> bool {
    if let Some(prev) = line[..start].chars().next_back()
        && (prev == '\'' || prev == '"' || prev == '.')
    {
        return false;
    }
    let rest = &line[end..];
    if let Some(next) = rest.chars().next()
        && (next == '\'' || next == '"')
    {
        return false;
    }
    let trimmed = rest.trim_start();
    !(trimmed.starts_with(':') || trimmed.starts_with('='))
}

#[allow(clippy::too_many_arguments)]
fn push_occurrence(
    occurrences: &mut Vec<KeyOccurrence>,
    seen: &mut HashSet<(usize, usize)>,
    line: &str,
    line_no: usize,
    key: &str,
    byte_start: usize,
    byte_end: usize,
    rule: MatchRule,
    map: &LocaleMap,
) {
    // Soundness gate: only keys the map actually resolves are reported.
    if map.get(key).is_none() {
        return;
    }
    // Byte offsets to character columns; CJK text before the key would
    // otherwise skew the span.
    let start = line[..byte_start].chars().count();
    let end = start + line[byte_start..byte_end].chars().count();
    if !seen.insert((start, end)) {
        return;
    }
    occurrences.push(KeyOccurrence {
        key: key.to_string(),
        line: line_no,
        start,
        end,
        rule,
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::locale::LocaleMap;
    use crate::scan::occurrence::MatchRule;
    use crate::scan::rules::*;

    fn rules() -> RuleSet {
        RuleSet::new(
            &[
                "R".to_string(),
                "_t.R".to_string(),
                "LanData.R".to_string(),
            ],
            &["data-i18n".to_string(), "i18n-key".to_string()],
        )
        .unwrap()
    }

    fn map() -> LocaleMap {
        LocaleMap::from_entries(vec![
            ("l0001".to_string(), "Search".to_string()),
            ("l0002".to_string(), "Cancel".to_string()),
        ])
    }

    #[test]
    fn test_precise_rule_suppresses_general() {
        let found = rules().scan_line("    'l0001': 'Search',", 1, &map());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rule, MatchRule::KeyValuePair);
    }

    #[test]
    fn test_bracket_access() {
        let found = rules().scan_line("var label = R['l0001'];", 1, &map());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rule, MatchRule::PropertyAccess);
        assert_eq!(found[0].key, "l0001");
    }

    #[test]
    fn test_dot_access_with_compound_prefix() {
        let found = rules().scan_line("show(LanData.R.l0002);", 1, &map());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rule, MatchRule::PropertyAccess);
    }

    #[test]
    fn test_call_lookup() {
        let found = rules().scan_line("var text = _t.R('l0001');", 1, &map());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rule, MatchRule::CallLookup);
    }

    #[test]
    fn test_attribute_binding() {
        let found = rules().scan_line(r#"<span data-i18n="l0001"></span>"#, 1, &map());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rule, MatchRule::AttributeBinding);
    }

    #[test]
    fn test_interpolation() {
        let found = rules().scan_line("<td>{{ l0002 }}</td>", 1, &map());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rule, MatchRule::Interpolation);
    }

    #[test]
    fn test_quoted_literal() {
        let found = rules().scan_line("lookup('l0001')", 1, &map());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rule, MatchRule::QuotedLiteral);
    }

    #[test]
    fn test_bare_identifier() {
        let found = rules().scan_line("annotate(l0001)", 1, &map());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rule, MatchRule::BareIdentifier);
    }

    #[test]
    fn test_bare_identifier_rejects_declaration_shape() {
        assert!(rules().scan_line("l0001 = something", 1, &map()).is_empty());
        assert!(rules().scan_line("l0001 : something", 1, &map()).is_empty());
    }

    #[test]
    fn test_unknown_keys_never_reported() {
        let found = rules().scan_line("use(R['l9999'], 'l8888', l7777)", 1, &map());
        assert!(found.is_empty());
    }

    #[test]
    fn test_case_insensitive_fallback_lookup() {
        let found = rules().scan_line("use(R['L0001'])", 1, &map());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, "L0001");
    }

    #[test]
    fn test_deduplicated_by_span() {
        // Both the call-lookup rule and the quoted-literal rule cover this
        // key; the span must be reported once.
        let found = rules().scan_line("_t.R('l0001')", 1, &map());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_char_columns_with_cjk_prefix() {
        let line = "注释内容 R['l0001']";
        let found = rules().scan_line(line, 1, &map());
        assert_eq!(found.len(), 1);
        let start = found[0].start;
        let end = found[0].end;
        let covered: String = line.chars().skip(start).take(end - start).collect();
        assert_eq!(covered, "l0001");
    }

    #[test]
    fn test_empty_prefixes_disable_access_rules() {
        let rules = RuleSet::new(&[], &[]).unwrap();
        let found = rules.scan_line("R['l0001']", 1, &map());
        // Quoted-literal still fires; property-access cannot.
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].rule, MatchRule::QuotedLiteral);
    }

    #[test]
    fn test_multiple_occurrences_one_line() {
        let found = rules().scan_line("pair(R.l0001, R.l0002)", 1, &map());
        assert_eq!(found.len(), 2);
        assert!(found[0].start < found[1].start);
    }
}
