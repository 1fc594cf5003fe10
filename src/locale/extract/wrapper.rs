//! Extraction from closure-wrapped locale objects.
//!
//! Legacy resource files are often shaped as a self-invoking closure that
//! builds a named object and hangs it on a global:
//!
//! ```text
//! (function (window) {
//!     var zhCn = { name: 'zhCn', R: { l0001: 'Search', ... } };
//!     window.LanData = zhCn;
//! })(this);
//! ```
//!
//! The key table lives in the nested `R` field. We isolate its balanced
//! brace span, textually neutralize constructs a literal parser cannot
//! take (helper calls, member-chain values, ternaries, trailing commas),
//! and structurally evaluate the result. If that still fails, the flat
//! key:value scan runs on just the table's span.

use std::sync::LazyLock;

use regex::Regex;

use crate::locale::extract::flat_scan;
use crate::locale::extract::object::{brace_span, parse_object_literal};

/// Marker for the named locale object (`name: 'zhCn'`).
static NAME_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bname\s*:\s*['"][A-Za-z_][\w]*['"]"#).expect("valid pattern"));

/// Start of the nested key-table field.
static TABLE_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bR\s*:\s*\{").expect("valid pattern"));

/// `helper(args)` and `obj.helper(args)` calls used as values.
static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_$][\w$]*(?:\.[\w$]+)*\([^()]*\)").expect("valid pattern")
});

/// Unquoted member-chain values such as `commonHM.labels.search`.
static MEMBER_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(:\s*)[A-Za-z_$][\w$]*(?:\.[\w$]+|\[['"]\w+['"]\])+"#).expect("valid pattern")
});

/// Conditional values: keep the else branch, drop condition and then-branch.
static TERNARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#":\s*[^,{}'"]*\?[^,{}:]*:\s*"#).expect("valid pattern"));

static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("valid pattern"));

/// Try to extract the nested key table from a closure-wrapped module.
pub fn extract_wrapped(text: &str) -> Option<Vec<(String, String)>> {
    if !NAME_FIELD_RE.is_match(text) {
        return None;
    }
    let table = TABLE_FIELD_RE.find(text)?;
    let open = table.end() - 1;
    let span = brace_span(text, open)?;

    if let Some(entries) = parse_object_literal(&neutralize(span))
        && !entries.is_empty()
    {
        return Some(entries);
    }

    // Last resort: scan only within the table's span so unrelated fields of
    // the wrapper object cannot contribute.
    let entries = flat_scan(span)?;
    if entries.is_empty() { None } else { Some(entries) }
}

/// Replace non-literal constructs with parseable placeholders.
fn neutralize(span: &str) -> String {
    let step = CALL_RE.replace_all(span, "''");
    let step = MEMBER_VALUE_RE.replace_all(&step, "$1''");
    let step = TERNARY_RE.replace_all(&step, ": ");
    TRAILING_COMMA_RE.replace_all(&step, "$1").into_owned()
}
