//! Annotation pipeline: ties the store, scanner, and scheduler together.
//!
//! The host loop feeds edits, focus changes, resource-file changes, and
//! clock ticks into an [`Annotator`]; resolved occurrences flow out
//! through a [`PresentationSink`]. How annotations are rendered is the
//! sink's business, which keeps the pipeline editor-agnostic.

pub mod scheduler;

pub use scheduler::{AnnotationScheduler, ScanTask, ScheduleOutcome};

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::config::Config;
use crate::locale::{Candidate, LoadResult, LocaleMap, LocaleStore};
use crate::scan::{KeyOccurrence, RuleSet, is_resource_module, scan_buffer};

/// Receives resolved occurrences for a buffer. Publishing replaces the
/// buffer's previous annotations wholesale; an empty slice clears them.
pub trait PresentationSink {
    fn publish(&mut self, buffer_id: &str, occurrences: &[KeyOccurrence], map: &LocaleMap);
}

/// The live annotation pipeline for one project.
pub struct Annotator<S: PresentationSink> {
    config: Config,
    candidates: Vec<Candidate>,
    store: LocaleStore,
    rules: RuleSet,
    scheduler: AnnotationScheduler,
    /// Latest text of each open buffer, for rescans after a resource
    /// reload.
    buffers: HashMap<String, String>,
    sink: S,
}

impl<S: PresentationSink> Annotator<S> {
    pub fn new(config: Config, candidates: Vec<Candidate>, sink: S) -> Result<Self> {
        config.validate()?;
        let rules = RuleSet::new(&config.key_prefixes, &config.attribute_names)?;
        let scheduler = AnnotationScheduler::new(config.debounce_ms, config.max_buffer_bytes);
        Ok(Self {
            config,
            candidates,
            store: LocaleStore::new(),
            rules,
            scheduler,
            buffers: HashMap::new(),
            sink,
        })
    }

    pub fn on_edit(&mut self, buffer_id: &str, text: &str, now: Instant) {
        if !self.config.enabled {
            return;
        }
        self.buffers.insert(buffer_id.to_string(), text.to_string());
        self.scheduler.on_edit(buffer_id, text, now);
    }

    pub fn on_focus(&mut self, buffer_id: &str, text: &str, now: Instant) {
        if !self.config.enabled {
            return;
        }
        self.buffers.insert(buffer_id.to_string(), text.to_string());
        self.scheduler.on_focus(buffer_id, text, now);
    }

    pub fn on_buffer_closed(&mut self, buffer_id: &str) {
        self.buffers.remove(buffer_id);
    }

    /// A watched resource file changed on disk: drop the cached map and
    /// rescan every open buffer against the fresh one.
    pub fn on_resource_change(&mut self, path: &Path, now: Instant) {
        if !self.config.enabled {
            return;
        }
        self.store.invalidate(path);
        self.rescan_open_buffers(now);
    }

    /// Manually reload resources, bypassing the cache, and rescan.
    pub fn reload_resources(&mut self, now: Instant) -> Option<LoadResult> {
        if !self.config.enabled {
            return None;
        }
        let result = self.store.load(&self.candidates, true);
        self.rescan_open_buffers(now);
        Some(result)
    }

    fn rescan_open_buffers(&mut self, now: Instant) {
        let open: Vec<(String, String)> = self
            .buffers
            .iter()
            .map(|(id, text)| (id.clone(), text.clone()))
            .collect();
        for (buffer_id, text) in open {
            self.scheduler.on_focus(&buffer_id, &text, now);
        }
    }

    /// Run every scan that has come due. Returns how many buffers were
    /// published.
    pub fn tick(&mut self, now: Instant) -> usize {
        if !self.config.enabled {
            return 0;
        }
        let tasks = self.scheduler.poll(now);
        if tasks.is_empty() {
            return 0;
        }

        // Ensure the cache is warm, then scan against its snapshot.
        self.store.load(&self.candidates, false);
        let Some(map) = self.store.current() else {
            return 0;
        };

        let mut published = 0;
        for task in tasks {
            if !self.scheduler.is_current(&task) {
                continue;
            }
            if is_resource_module(&task.buffer_id, &self.config.resource_file_names) {
                // Resource modules define keys; they are never annotated
                // as usages.
                self.sink.publish(&task.buffer_id, &[], &map);
                published += 1;
                continue;
            }
            let occurrences = scan_buffer(&task.text, &map, &self.rules);
            self.sink.publish(&task.buffer_id, &occurrences, &map);
            published += 1;
        }
        published
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
