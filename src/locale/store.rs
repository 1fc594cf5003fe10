//! Resource Merge/Cache.
//!
//! Owns the process-wide merged [`LocaleMap`]. Loading reads each candidate
//! file, runs the extraction cascade, and merges per-file maps in candidate
//! order (later files overwrite earlier ones). The merged result is cached
//! against the candidate path list; an external file-change notification
//! invalidates it through [`LocaleStore::invalidate`] — there is no polling.
//!
//! Readers take an `Arc` snapshot, so a reload never tears a scan that is
//! already in flight: the old map stays alive until the last reader drops it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::locale::extract::{Strategy, extract_with_strategy};
use crate::locale::map::LocaleMap;

/// How a candidate resource file entered the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOrigin {
    /// Configured explicitly (`localePath`); merge-authoritative.
    Explicit,
    /// Found by auto-discovery globbing.
    Discovered,
}

/// Outcome of loading one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Extraction produced this many entries, via this cascade strategy.
    Loaded { entries: usize, strategy: Strategy },
    /// The file was readable but the cascade found no entries.
    Empty,
    /// The file could not be read; candidate skipped, non-fatal.
    ReadError(String),
}

/// A discovered candidate resource file and what became of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    pub path: PathBuf,
    pub origin: ResourceOrigin,
    pub outcome: LoadOutcome,
}

/// A candidate path before loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub origin: ResourceOrigin,
}

impl Candidate {
    pub fn discovered(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            origin: ResourceOrigin::Discovered,
        }
    }

    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            origin: ResourceOrigin::Explicit,
        }
    }
}

/// Where the active map's data came from. Callers use this to warn when the
/// built-in defaults are in effect without failing activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSource {
    /// Merged from this many successfully loaded files.
    Files { files_loaded: usize },
    /// Every candidate failed or none existed; built-in sample data.
    BuiltinDefaults,
}

/// Result of one load, kept alive for cache hits.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub map: Arc<LocaleMap>,
    pub source: MapSource,
    pub files: Vec<ResourceFile>,
}

#[derive(Debug)]
struct CacheEntry {
    paths: Vec<PathBuf>,
    result: LoadResult,
}

/// Process-scoped cache of the merged locale map.
#[derive(Debug, Default)]
pub struct LocaleStore {
    cache: Option<CacheEntry>,
}

impl LocaleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and merge the candidates, reusing the cached result when the
    /// candidate list is unchanged. `force_reload` bypasses the cache.
    pub fn load(&mut self, candidates: &[Candidate], force_reload: bool) -> LoadResult {
        let paths: Vec<PathBuf> = candidates.iter().map(|c| c.path.clone()).collect();

        if !force_reload
            && let Some(entry) = &self.cache
            && entry.paths == paths
        {
            return entry.result.clone();
        }

        let result = load_candidates(candidates);
        self.cache = Some(CacheEntry {
            paths,
            result: result.clone(),
        });
        result
    }

    /// Drop the cache if `path` participates in the cached candidate set.
    /// Called from the file-change collaborator; the next `load` re-reads.
    pub fn invalidate(&mut self, path: &Path) {
        if let Some(entry) = &self.cache
            && entry.paths.iter().any(|p| p == path)
        {
            self.cache = None;
        }
    }

    /// The active snapshot, if a load has happened.
    pub fn current(&self) -> Option<Arc<LocaleMap>> {
        self.cache.as_ref().map(|entry| entry.result.map.clone())
    }
}

fn load_candidates(candidates: &[Candidate]) -> LoadResult {
    let mut files = Vec::with_capacity(candidates.len());
    let mut maps = Vec::new();

    for candidate in candidates {
        let outcome = match fs::read_to_string(&candidate.path) {
            Ok(content) => {
                let (map, strategy) = extract_with_strategy(&content);
                match strategy {
                    Some(strategy) => {
                        let entries = map.len();
                        maps.push(map);
                        LoadOutcome::Loaded { entries, strategy }
                    }
                    None => LoadOutcome::Empty,
                }
            }
            Err(err) => LoadOutcome::ReadError(err.to_string()),
        };
        files.push(ResourceFile {
            path: candidate.path.clone(),
            origin: candidate.origin,
            outcome,
        });
    }

    if maps.is_empty() {
        return LoadResult {
            map: Arc::new(LocaleMap::builtin_defaults()),
            source: MapSource::BuiltinDefaults,
            files,
        };
    }

    let files_loaded = maps.len();
    LoadResult {
        map: Arc::new(LocaleMap::merge(maps)),
        source: MapSource::Files { files_loaded },
        files,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::locale::store::*;

    fn write_resource(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_and_merge_precedence() {
        let dir = tempdir().unwrap();
        let first = write_resource(dir.path(), "a.js", "const R = {l0001: 'first', l0002: 'a'}");
        let second = write_resource(dir.path(), "b.js", "const R = {l0001: 'second'}");

        let mut store = LocaleStore::new();
        let result = store.load(
            &[Candidate::discovered(first), Candidate::explicit(second)],
            false,
        );

        // Later candidate wins on conflict.
        assert_eq!(result.map.get("l0001"), Some("second"));
        assert_eq!(result.map.get("l0002"), Some("a"));
        assert_eq!(result.source, MapSource::Files { files_loaded: 2 });
    }

    #[test]
    fn test_read_error_is_skipped() {
        let dir = tempdir().unwrap();
        let good = write_resource(dir.path(), "good.js", "const R = {l0001: 'ok'}");
        let missing = dir.path().join("missing.js");

        let mut store = LocaleStore::new();
        let result = store.load(
            &[Candidate::discovered(missing), Candidate::discovered(good)],
            false,
        );

        assert_eq!(result.map.get("l0001"), Some("ok"));
        assert!(matches!(result.files[0].outcome, LoadOutcome::ReadError(_)));
        assert_eq!(
            result.files[1].outcome,
            LoadOutcome::Loaded {
                entries: 1,
                strategy: Strategy::NamedBinding,
            }
        );
    }

    #[test]
    fn test_all_failing_falls_back_to_defaults() {
        let mut store = LocaleStore::new();
        let result = store.load(&[Candidate::discovered("/nonexistent/zh.js")], false);

        assert_eq!(result.source, MapSource::BuiltinDefaults);
        assert!(!result.map.is_empty());
    }

    #[test]
    fn test_no_candidates_falls_back_to_defaults() {
        let mut store = LocaleStore::new();
        let result = store.load(&[], false);
        assert_eq!(result.source, MapSource::BuiltinDefaults);
    }

    #[test]
    fn test_cache_hit_skips_reread() {
        let dir = tempdir().unwrap();
        let path = write_resource(dir.path(), "zh.js", "const R = {l0001: 'v1'}");
        let candidates = [Candidate::explicit(&path)];

        let mut store = LocaleStore::new();
        let first = store.load(&candidates, false);
        assert_eq!(first.map.get("l0001"), Some("v1"));

        // Change on disk; the cached snapshot must still be served.
        fs::write(&path, "const R = {l0001: 'v2'}").unwrap();
        let cached = store.load(&candidates, false);
        assert_eq!(cached.map.get("l0001"), Some("v1"));

        // Force reload bypasses the cache.
        let fresh = store.load(&candidates, true);
        assert_eq!(fresh.map.get("l0001"), Some("v2"));
    }

    #[test]
    fn test_invalidate_matching_path() {
        let dir = tempdir().unwrap();
        let path = write_resource(dir.path(), "zh.js", "const R = {l0001: 'v1'}");
        let candidates = [Candidate::explicit(&path)];

        let mut store = LocaleStore::new();
        store.load(&candidates, false);
        fs::write(&path, "const R = {l0001: 'v2'}").unwrap();

        store.invalidate(&path);
        let result = store.load(&candidates, false);
        assert_eq!(result.map.get("l0001"), Some("v2"));
    }

    #[test]
    fn test_invalidate_unrelated_path_keeps_cache() {
        let dir = tempdir().unwrap();
        let path = write_resource(dir.path(), "zh.js", "const R = {l0001: 'v1'}");
        let candidates = [Candidate::explicit(&path)];

        let mut store = LocaleStore::new();
        store.load(&candidates, false);
        fs::write(&path, "const R = {l0001: 'v2'}").unwrap();

        store.invalidate(Path::new("/some/other/file.js"));
        let result = store.load(&candidates, false);
        assert_eq!(result.map.get("l0001"), Some("v1"));
    }

    #[test]
    fn test_changed_candidate_set_reloads() {
        let dir = tempdir().unwrap();
        let a = write_resource(dir.path(), "a.js", "const R = {l0001: 'a'}");
        let b = write_resource(dir.path(), "b.js", "const R = {l0002: 'b'}");

        let mut store = LocaleStore::new();
        let first = store.load(&[Candidate::discovered(&a)], false);
        assert!(first.map.contains_key("l0001"));

        let second = store.load(
            &[Candidate::discovered(&a), Candidate::discovered(&b)],
            false,
        );
        assert!(second.map.contains_key("l0002"));
    }

    #[test]
    fn test_current_tracks_cache_lifecycle() {
        let dir = tempdir().unwrap();
        let path = write_resource(dir.path(), "zh.js", "const R = {l0001: 'v1'}");
        let candidates = [Candidate::explicit(&path)];

        let mut store = LocaleStore::new();
        assert!(store.current().is_none());

        store.load(&candidates, false);
        assert_eq!(store.current().unwrap().get("l0001"), Some("v1"));

        store.invalidate(&path);
        assert!(store.current().is_none());
    }

    #[test]
    fn test_empty_file_outcome() {
        let dir = tempdir().unwrap();
        let path = write_resource(dir.path(), "empty.js", "function unrelated() {}");

        let mut store = LocaleStore::new();
        let result = store.load(&[Candidate::discovered(path)], false);
        assert_eq!(result.files[0].outcome, LoadOutcome::Empty);
        assert_eq!(result.source, MapSource::BuiltinDefaults);
    }
}
