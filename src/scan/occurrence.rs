//! Occurrence records produced by the scanner.

use std::fmt;

/// Which syntactic rule recognized a key occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// `'lDDDD': 'text'` definition-shaped pair; suppresses all general
    /// rules on its line.
    KeyValuePair,
    /// `R.lDDDD` or `R['lDDDD']` through a configured prefix.
    PropertyAccess,
    /// `_t.R('lDDDD')` lookup-call through a configured prefix.
    CallLookup,
    /// `data-i18n="lDDDD"` on a configured attribute name.
    AttributeBinding,
    /// `{{ lDDDD }}` template interpolation.
    Interpolation,
    /// A key alone inside quotes.
    QuotedLiteral,
    /// An unquoted key token in general code.
    BareIdentifier,
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchRule::KeyValuePair => "key-value-pair",
            MatchRule::PropertyAccess => "property-access",
            MatchRule::CallLookup => "call-lookup",
            MatchRule::AttributeBinding => "attribute-binding",
            MatchRule::Interpolation => "interpolation",
            MatchRule::QuotedLiteral => "quoted-literal",
            MatchRule::BareIdentifier => "bare-identifier",
        };
        write!(f, "{}", name)
    }
}

/// One key found in a scanned buffer.
///
/// `line` is 1-based; `start`/`end` are 0-based character columns covering
/// the key token only (end exclusive), never surrounding quotes or
/// prefixes. Character columns keep spans stable in CJK-heavy lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOccurrence {
    pub key: String,
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub rule: MatchRule,
}
