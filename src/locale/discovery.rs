//! Candidate discovery for locale resource files.
//!
//! Produces the ordered candidate list the store merges: auto-detected
//! conventional locations first, the explicitly configured path last so it
//! stays merge-authoritative.

use std::path::PathBuf;

use glob::glob;

use crate::config::Config;
use crate::locale::store::Candidate;

/// Source of candidate resource paths. The glob walker implements this for
/// real workspaces; tests substitute fixed lists.
pub trait CandidateDiscovery {
    fn discover(&self) -> Vec<Candidate>;
}

/// Conventional locations a Chinese locale module tends to live at.
const AUTO_DETECT_PATTERNS: &[&str] = &[
    "**/locale/zh.js",
    "**/locale/zh_CN.js",
    "**/locales/zh.js",
    "**/locales/zh_CN.js",
    "**/i18n/zh.js",
    "**/i18n/zh_CN.js",
    "**/lang/zh.js",
    "**/language/zh.js",
    "**/translations/zh.js",
];

/// Glob-based discovery over one or more workspace roots.
pub struct GlobDiscovery<'a> {
    roots: Vec<PathBuf>,
    config: &'a Config,
}

impl<'a> GlobDiscovery<'a> {
    pub fn new(roots: Vec<PathBuf>, config: &'a Config) -> Self {
        Self { roots, config }
    }

    fn explicit_candidates(&self) -> Vec<Candidate> {
        let configured = self.config.locale_path.trim();
        if configured.is_empty() {
            return Vec::new();
        }

        let path = PathBuf::from(configured);
        if path.is_absolute() {
            // Passed through even when missing so the store surfaces the
            // read error instead of silently ignoring the setting.
            return vec![Candidate::explicit(path)];
        }

        self.roots
            .iter()
            .map(|root| root.join(configured))
            .filter(|joined| joined.exists())
            .map(Candidate::explicit)
            .collect()
    }

    fn auto_candidates(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for root in &self.roots {
            for pattern in AUTO_DETECT_PATTERNS {
                let full = root.join(pattern);
                let Some(full) = full.to_str() else {
                    continue;
                };
                let Ok(paths) = glob(full) else {
                    continue;
                };
                for path in paths.flatten() {
                    found.push(path);
                }
            }
        }
        found
    }
}

impl CandidateDiscovery for GlobDiscovery<'_> {
    fn discover(&self) -> Vec<Candidate> {
        let explicit = self.explicit_candidates();
        let mut candidates: Vec<Candidate> = Vec::new();

        if self.config.auto_detect {
            for path in self.auto_candidates() {
                let duplicate = explicit.iter().any(|c| c.path == path)
                    || candidates.iter().any(|c| c.path == path);
                if !duplicate {
                    candidates.push(Candidate::discovered(path));
                }
            }
        }

        // Explicit path last: the store's merge makes later files win.
        candidates.extend(explicit);
        candidates
    }
}
