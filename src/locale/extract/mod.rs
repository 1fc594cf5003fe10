//! Resource Extraction Engine.
//!
//! Resource modules follow no fixed schema: the same key table shows up as
//! a named binding, a default export, a CommonJS export, a module that has
//! to be "run", or a closure-wrapped global. `extract` recovers a
//! [`LocaleMap`](crate::locale::LocaleMap) through an ordered cascade of
//! best-effort strategies; the first strategy producing a non-empty table
//! wins, and no strategy failure ever escapes the cascade.

mod object;
mod sandbox;
mod wrapper;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::locale::LocaleMap;
use object::{brace_span, parse_object_literal, strip_comments};

/// Which cascade strategy produced a map. Ordering is the cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strategy {
    /// `const R = { ... }` with a conventional binding name.
    NamedBinding,
    /// `export default { ... }`.
    DefaultExport,
    /// `module.exports = { ... }`.
    ModuleExport,
    /// Bounded evaluation of the whole module's top level.
    SandboxEval,
    /// Flat `key: 'text'` scan over the entire text.
    FlatScan,
    /// Closure-wrapped named object with a nested key table.
    NestedWrapper,
}

impl Strategy {
    const ALL: [Strategy; 6] = [
        Strategy::NamedBinding,
        Strategy::DefaultExport,
        Strategy::ModuleExport,
        Strategy::SandboxEval,
        Strategy::FlatScan,
        Strategy::NestedWrapper,
    ];

    fn apply(self, text: &str) -> Option<Vec<(String, String)>> {
        match self {
            Strategy::NamedBinding => extract_named_binding(text),
            Strategy::DefaultExport => extract_default_export(text),
            Strategy::ModuleExport => extract_module_export(text),
            Strategy::SandboxEval => sandbox::evaluate_module(text),
            Strategy::FlatScan => flat_scan(text),
            Strategy::NestedWrapper => wrapper::extract_wrapped(text),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::NamedBinding => write!(f, "named-binding"),
            Strategy::DefaultExport => write!(f, "default-export"),
            Strategy::ModuleExport => write!(f, "module-export"),
            Strategy::SandboxEval => write!(f, "sandbox-eval"),
            Strategy::FlatScan => write!(f, "flat-scan"),
            Strategy::NestedWrapper => write!(f, "nested-wrapper"),
        }
    }
}

/// Extract a key table from raw resource-module text.
///
/// Never fails: an exhausted cascade yields an empty map, which callers
/// treat as "no data available", not as an error.
pub fn extract(text: &str) -> LocaleMap {
    extract_with_strategy(text).0
}

/// Like [`extract`], also reporting which strategy won (for diagnostics).
pub fn extract_with_strategy(text: &str) -> (LocaleMap, Option<Strategy>) {
    for strategy in Strategy::ALL {
        if let Some(entries) = strategy.apply(text)
            && !entries.is_empty()
        {
            return (LocaleMap::from_entries(entries), Some(strategy));
        }
    }
    (LocaleMap::default(), None)
}

/// Binding names resource modules conventionally use for the key table.
static NAMED_BINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:const|var|let)\s+(?:R|LanData)\s*=\s*\{").expect("valid pattern")
});

static DEFAULT_EXPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"export\s+default\s*\{").expect("valid pattern"));

static MODULE_EXPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"module\.exports\s*=\s*\{").expect("valid pattern"));

/// Flat `'lDDDD': 'text'` pairs, key optionally quoted, value quoted with
/// either quote style. Regex has no backreferences, so the two quote styles
/// are separate alternations.
static FLAT_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"]?([lL]\d{4,})['"]?\s*:\s*(?:'([^']*)'|"([^"]*)")"#).expect("valid pattern")
});

fn extract_named_binding(text: &str) -> Option<Vec<(String, String)>> {
    slice_and_parse(text, &NAMED_BINDING_RE)
}

fn extract_default_export(text: &str) -> Option<Vec<(String, String)>> {
    slice_and_parse(&strip_comments(text), &DEFAULT_EXPORT_RE)
}

fn extract_module_export(text: &str) -> Option<Vec<(String, String)>> {
    slice_and_parse(&strip_comments(text), &MODULE_EXPORT_RE)
}

/// Locate the declaration matched by `re`, slice its balanced object
/// literal, and structurally evaluate it.
fn slice_and_parse(text: &str, re: &Regex) -> Option<Vec<(String, String)>> {
    let found = re.find(text)?;
    let open = found.end() - 1;
    let span = brace_span(text, open)?;
    parse_object_literal(span)
}

/// Scan the entire text for flat key:value pairs, independent of syntax.
///
/// This is the catch-all that still recovers data from truncated or
/// hand-mangled files.
pub(crate) fn flat_scan(text: &str) -> Option<Vec<(String, String)>> {
    let entries: Vec<(String, String)> = FLAT_PAIR_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str().to_string();
            Some((key, value))
        })
        .collect();
    if entries.is_empty() { None } else { Some(entries) }
}
