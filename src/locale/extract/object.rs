//! Structural evaluation of JavaScript object literals.
//!
//! Resource modules declare their key tables as plain object literals in a
//! handful of wrapper shapes. The extraction strategies slice the literal
//! text out of the module and hand it here; we parse it with swc and walk
//! the AST, keeping only `lDDDD`-shaped keys with string-literal values.
//! Nothing is executed, so a malformed literal can only fail to parse.

use std::sync::Arc;

use swc_common::{FileName, GLOBALS, Globals, SourceMap};
use swc_ecma_ast::{Expr, Lit, ObjectLit, Prop, PropName, PropOrSpread};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax};

use crate::locale::map::is_locale_key;

/// Parse `src` as a single object literal and collect conforming entries.
///
/// Returns `None` when the text is not a parseable object literal. Entries
/// with non-string values or non-key-shaped names are dropped, not errors.
pub fn parse_object_literal(src: &str) -> Option<Vec<(String, String)>> {
    // Same trick as evaluating "(" + literal + ")": forces the parser to
    // read a leading brace as an expression, not a block.
    let wrapped = format!("({})", src);

    GLOBALS.set(&Globals::new(), || {
        let source_map: Arc<SourceMap> = Arc::default();
        let source_file = source_map.new_source_file(FileName::Anon.into(), wrapped);

        let syntax = Syntax::Es(EsSyntax::default());
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let script = parser.parse_script().ok()?;
        let stmt = script.body.first()?;
        let expr = stmt.as_expr()?;
        let object = as_object_literal(&expr.expr)?;

        let mut entries = Vec::new();
        collect_string_entries(object, &mut entries);
        Some(entries)
    })
}

/// Unwrap parentheses down to an object literal, if that is what `expr` is.
pub fn as_object_literal(expr: &Expr) -> Option<&ObjectLit> {
    match expr {
        Expr::Object(object) => Some(object),
        Expr::Paren(paren) => as_object_literal(&paren.expr),
        _ => None,
    }
}

/// Walk an object literal, collecting `lDDDD: "text"` pairs at any depth.
///
/// Nested objects are descended into so a table split into sections still
/// yields all of its keys. Spreads, getters, and computed keys are skipped.
pub fn collect_string_entries(object: &ObjectLit, out: &mut Vec<(String, String)>) {
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let Prop::KeyValue(pair) = prop.as_ref() else {
            continue;
        };
        let key = match &pair.key {
            PropName::Ident(ident) => ident.sym.as_ref(),
            // Str atoms are WTF-8; skip the rare non-UTF-8 ones.
            PropName::Str(s) => match s.value.as_str() {
                Some(key) => key,
                None => continue,
            },
            _ => continue,
        };
        match pair.value.as_ref() {
            Expr::Lit(Lit::Str(s)) if is_locale_key(key) => {
                if let Some(value) = s.value.as_str() {
                    out.push((key.to_string(), value.to_string()));
                }
            }
            Expr::Object(nested) => collect_string_entries(nested, out),
            _ => {}
        }
    }
}

/// Return the balanced `{...}` slice starting at byte offset `open`.
///
/// Braces inside single- or double-quoted strings do not count toward the
/// balance; backslash escapes inside strings are honored. Returns `None`
/// if `open` is not a `{` or the braces never balance.
pub fn brace_span(text: &str, open: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (offset, byte) in bytes[open..].iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == q {
                quote = None;
            }
            continue;
        }
        match byte {
            b'\'' | b'"' | b'`' => quote = Some(*byte),
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open..=open + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Remove `//` line comments and `/* */` block comments.
///
/// String contents are left untouched, so a URL in a value survives. The
/// strategies strip comments before slicing a literal so that a brace
/// inside a comment cannot skew the balance.
pub fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let bytes = src.as_bytes();
    let mut i = 0;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    while i < bytes.len() {
        let byte = bytes[i];
        if let Some(q) = quote {
            // Copy whole UTF-8 sequences; multibyte lead bytes can never
            // collide with the quote or escape bytes.
            let ch_len = utf8_len(byte);
            out.push_str(&src[i..i + ch_len]);
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == q {
                quote = None;
            }
            i += ch_len;
            continue;
        }
        match byte {
            b'\'' | b'"' | b'`' => {
                quote = Some(byte);
                out.push(byte as char);
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
            }
            _ => {
                // Copy the full UTF-8 sequence, not just the lead byte.
                let ch_len = utf8_len(byte);
                out.push_str(&src[i..i + ch_len]);
                i += ch_len;
            }
        }
    }
    out
}

fn utf8_len(first_byte: u8) -> usize {
    match first_byte {
        b if b < 0x80 => 1,
        b if b >= 0xF0 => 4,
        b if b >= 0xE0 => 3,
        _ => 2,
    }
}
