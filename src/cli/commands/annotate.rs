//! The `annotate` command: batch-scan a project and print resolved keys.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use walkdir::{DirEntry, WalkDir};

use crate::cli::args::AnnotateCommand;
use crate::cli::commands::CommandResult;
use crate::config::load_config;
use crate::locale::discovery::{CandidateDiscovery, GlobDiscovery};
use crate::locale::{LocaleStore, MapSource};
use crate::report::{render_file, render_load, render_summary};
use crate::scan::{KeyOccurrence, RuleSet, is_resource_module, scan_buffer};

/// File types the batch scanner looks at.
const SCAN_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "html", "htm", "vue"];

const SKIP_DIRS: &[&str] = &["node_modules", ".git", "dist", "build"];

pub fn annotate(cmd: AnnotateCommand) -> Result<CommandResult> {
    let root = match &cmd.common.root {
        Some(root) => root.clone(),
        None => env::current_dir().context("failed to resolve current directory")?,
    };
    let mut loaded = load_config(&root)?;
    if let Some(path) = &cmd.common.locale_path {
        loaded.config.locale_path = path.display().to_string();
    }
    let config = loaded.config;
    if !config.enabled {
        return Ok(CommandResult::default());
    }

    let discovery = GlobDiscovery::new(vec![root.clone()], &config);
    let candidates = discovery.discover();
    let mut store = LocaleStore::new();
    let load = store.load(&candidates, false);
    if cmd.common.verbose {
        print!("{}", render_load(&load));
    }

    let rules = RuleSet::new(&config.key_prefixes, &config.attribute_names)?;
    let targets = collect_targets(&cmd.paths, &root, &config.resource_file_names);

    let map = &load.map;
    let reports: Vec<(PathBuf, String, Vec<KeyOccurrence>)> = targets
        .par_iter()
        .filter_map(|path| {
            // Unreadable and oversized files are skipped, not errors.
            let text = fs::read_to_string(path).ok()?;
            if text.len() > config.max_buffer_bytes {
                return None;
            }
            let occurrences = scan_buffer(&text, map, &rules);
            Some((path.clone(), text, occurrences))
        })
        .collect();

    let mut total = 0;
    for (path, text, occurrences) in &reports {
        total += occurrences.len();
        if !occurrences.is_empty() {
            let shown = relative_display(path, &root);
            print!("{}", render_file(&shown, text, occurrences, map));
        }
    }
    print!("{}", render_summary(reports.len(), total));

    Ok(CommandResult {
        files_scanned: reports.len(),
        occurrences: total,
        fell_back_to_defaults: load.source == MapSource::BuiltinDefaults,
    })
}

fn collect_targets(paths: &[PathBuf], root: &Path, resource_file_names: &[String]) -> Vec<PathBuf> {
    let seeds: Vec<PathBuf> = if paths.is_empty() {
        vec![root.to_path_buf()]
    } else {
        paths
            .iter()
            .map(|p| if p.is_absolute() { p.clone() } else { root.join(p) })
            .collect()
    };

    let mut targets = Vec::new();
    for seed in seeds {
        let walk = WalkDir::new(&seed)
            .into_iter()
            .filter_entry(|entry| !skipped_dir(entry));
        for entry in walk.flatten() {
            if !entry.file_type().is_file() || !scannable(entry.path()) {
                continue;
            }
            let name = entry.path().to_string_lossy();
            // Resource modules define keys, they are not scan targets.
            if is_resource_module(&name, resource_file_names) {
                continue;
            }
            targets.push(entry.into_path());
        }
    }
    targets.sort();
    targets.dedup();
    targets
}

fn skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

fn scannable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCAN_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
