//! Terminal rendering of scan results.
//!
//! Diagnostics follow the familiar compiler layout: a header naming the
//! key and its resolved text, the file location, then the source line
//! with a caret underline. Caret alignment uses display width, not
//! character count, so CJK text ahead of a key does not skew the markers.

use std::fmt::Write as _;

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::locale::{LoadOutcome, LoadResult, LocaleMap, MapSource, ResourceOrigin};
use crate::scan::KeyOccurrence;

/// Render every occurrence found in one file.
pub fn render_file(
    path: &str,
    text: &str,
    occurrences: &[KeyOccurrence],
    map: &LocaleMap,
) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = String::new();

    for occurrence in occurrences {
        let line_text = lines.get(occurrence.line - 1).copied().unwrap_or("");
        render_occurrence(&mut out, path, line_text, occurrence, map);
    }
    out
}

fn render_occurrence(
    out: &mut String,
    path: &str,
    line_text: &str,
    occurrence: &KeyOccurrence,
    map: &LocaleMap,
) {
    let value = map.get(&occurrence.key).unwrap_or("");
    let gutter = occurrence.line.to_string().len();

    let _ = writeln!(
        out,
        "{}[{}]: {} = {}",
        "key".cyan().bold(),
        occurrence.rule,
        occurrence.key.bold(),
        value
    );
    let _ = writeln!(
        out,
        "{:gutter$}{} {}:{}:{}",
        "",
        "-->".blue().bold(),
        path,
        occurrence.line,
        occurrence.start + 1
    );
    let _ = writeln!(out, "{:gutter$} {}", "", "|".blue().bold());
    let _ = writeln!(
        out,
        "{} {} {}",
        occurrence.line.to_string().blue().bold(),
        "|".blue().bold(),
        line_text
    );

    let prefix: String = line_text.chars().take(occurrence.start).collect();
    let span: String = line_text
        .chars()
        .skip(occurrence.start)
        .take(occurrence.end - occurrence.start)
        .collect();
    let pad = UnicodeWidthStr::width(prefix.as_str());
    let carets = "^".repeat(UnicodeWidthStr::width(span.as_str()).max(1));
    let _ = writeln!(
        out,
        "{:gutter$} {} {:pad$}{} {}",
        "",
        "|".blue().bold(),
        "",
        carets.yellow().bold(),
        value.yellow()
    );
    let _ = writeln!(out);
}

/// Render how the active map was assembled, one line per candidate.
pub fn render_load(result: &LoadResult) -> String {
    let mut out = String::new();

    for file in &result.files {
        let status = match &file.outcome {
            LoadOutcome::Loaded { entries, strategy } => {
                format!("{} entries via {}", entries, strategy)
                    .green()
                    .to_string()
            }
            LoadOutcome::Empty => "no entries".yellow().to_string(),
            LoadOutcome::ReadError(err) => format!("read error: {err}").red().to_string(),
        };
        let origin = match file.origin {
            ResourceOrigin::Explicit => "explicit",
            ResourceOrigin::Discovered => "discovered",
        };
        let _ = writeln!(
            out,
            "{:>12} {} [{}] ({})",
            "resource".cyan().bold(),
            file.path.display(),
            origin,
            status
        );
    }

    if result.source == MapSource::BuiltinDefaults {
        let _ = writeln!(
            out,
            "{}: no resource file loaded, using built-in sample data",
            "warning".yellow().bold()
        );
    }
    out
}

/// One-line closing summary.
pub fn render_summary(files_scanned: usize, occurrences: usize) -> String {
    format!(
        "{:>12} {} occurrence(s) across {} file(s)\n",
        "found".green().bold(),
        occurrences,
        files_scanned
    )
}
