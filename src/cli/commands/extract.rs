//! The `extract` command: run the cascade on one resource module.

use std::fs;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{Map, Value};

use crate::cli::args::ExtractCommand;
use crate::cli::commands::CommandResult;
use crate::locale::{LocaleMap, extract_with_strategy};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let text = fs::read_to_string(&cmd.file)
        .with_context(|| format!("failed to read {}", cmd.file.display()))?;

    let (map, strategy) = extract_with_strategy(&text);
    if cmd.common.verbose {
        match strategy {
            Some(strategy) => eprintln!(
                "{:>12} {} ({} entries)",
                "strategy".cyan().bold(),
                strategy,
                map.len()
            ),
            None => eprintln!(
                "{}: no extraction strategy matched",
                "warning".yellow().bold()
            ),
        }
    }

    println!("{}", to_sorted_json(&map)?);

    Ok(CommandResult {
        files_scanned: 1,
        occurrences: map.len(),
        fell_back_to_defaults: false,
    })
}

/// Serialize the map with sorted keys so output is diff-stable.
fn to_sorted_json(map: &LocaleMap) -> Result<String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    let mut object = Map::new();
    for key in keys {
        if let Some(value) = map.get(key) {
            object.insert(key.clone(), Value::String(value.to_string()));
        }
    }
    serde_json::to_string_pretty(&Value::Object(object)).context("failed to serialize key table")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::cli::args::CommonArgs;
    use crate::cli::commands::extract::*;

    #[test]
    fn test_extract_command() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("zh.js");
        fs::write(&file, "const R = {l0002: 'b', l0001: 'a'}").unwrap();

        let cmd = ExtractCommand {
            file,
            common: CommonArgs {
                root: None,
                locale_path: None,
                verbose: false,
            },
        };
        let result = extract(cmd).unwrap();
        assert_eq!(result.occurrences, 2);
    }

    #[test]
    fn test_extract_missing_file_is_error() {
        let cmd = ExtractCommand {
            file: "/definitely/missing.js".into(),
            common: CommonArgs {
                root: None,
                locale_path: None,
                verbose: false,
            },
        };
        assert!(extract(cmd).is_err());
    }

    #[test]
    fn test_sorted_json() {
        let map = LocaleMap::from_entries([("l0002", "b"), ("l0001", "a")]);
        let json = to_sorted_json(&map).unwrap();
        assert!(json.find("l0001").unwrap() < json.find("l0002").unwrap());
    }
}
