//! Debounced scheduling of buffer scans.
//!
//! Every edit restarts the buffer's debounce window; only the newest
//! scheduled scan per buffer is live, tracked with a generation counter.
//! Time is passed in by the caller, so scheduling is deterministic under
//! test and the host loop owns the clock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A scan that has come due. Carries the text captured at fire time, so a
/// slow consumer still scans what was scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTask {
    pub buffer_id: String,
    pub text: String,
    pub generation: u64,
}

/// Whether a request was accepted into the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled,
    /// Buffer exceeds the size ceiling; any pending scan is dropped too.
    SkippedOversized,
}

#[derive(Debug)]
struct Pending {
    deadline: Instant,
    text: String,
    generation: u64,
}

/// Per-buffer debouncer with last-scheduled-wins semantics.
#[derive(Debug)]
pub struct AnnotationScheduler {
    debounce: Duration,
    max_buffer_bytes: usize,
    pending: HashMap<String, Pending>,
    generations: HashMap<String, u64>,
}

impl AnnotationScheduler {
    pub fn new(debounce_ms: u64, max_buffer_bytes: usize) -> Self {
        Self {
            debounce: Duration::from_millis(debounce_ms),
            max_buffer_bytes,
            pending: HashMap::new(),
            generations: HashMap::new(),
        }
    }

    /// An edit arrived: restart the buffer's debounce window with the new
    /// text. The previous pending scan for the buffer, if any, is replaced.
    pub fn on_edit(&mut self, buffer_id: &str, text: &str, now: Instant) -> ScheduleOutcome {
        self.schedule(buffer_id, text, now + self.debounce)
    }

    /// Focus changed to this buffer: scan immediately, no debounce.
    pub fn on_focus(&mut self, buffer_id: &str, text: &str, now: Instant) -> ScheduleOutcome {
        self.schedule(buffer_id, text, now)
    }

    fn schedule(&mut self, buffer_id: &str, text: &str, deadline: Instant) -> ScheduleOutcome {
        let generation = self.bump(buffer_id);
        if text.len() > self.max_buffer_bytes {
            // The generation bump above already invalidates any in-flight
            // scan of stale text.
            self.pending.remove(buffer_id);
            return ScheduleOutcome::SkippedOversized;
        }
        self.pending.insert(
            buffer_id.to_string(),
            Pending {
                deadline,
                text: text.to_string(),
                generation,
            },
        );
        ScheduleOutcome::Scheduled
    }

    /// Drain every pending scan whose deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Vec<ScanTask> {
        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(id, _)| id.clone())
            .collect();

        due.into_iter()
            .filter_map(|buffer_id| {
                let pending = self.pending.remove(&buffer_id)?;
                Some(ScanTask {
                    buffer_id,
                    text: pending.text,
                    generation: pending.generation,
                })
            })
            .collect()
    }

    /// Whether a fired task still represents the newest schedule for its
    /// buffer. Results of stale tasks must be discarded, not published.
    pub fn is_current(&self, task: &ScanTask) -> bool {
        self.generations.get(&task.buffer_id) == Some(&task.generation)
    }

    /// Drop everything scheduled, bumping generations so in-flight results
    /// cannot land afterwards.
    pub fn cancel_all(&mut self) {
        let ids: Vec<String> = self.pending.keys().cloned().collect();
        for id in ids {
            self.bump(&id);
        }
        self.pending.clear();
    }

    fn bump(&mut self, buffer_id: &str) -> u64 {
        let counter = self.generations.entry(buffer_id.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::annotate::scheduler::*;

    fn scheduler() -> AnnotationScheduler {
        AnnotationScheduler::new(300, 1000)
    }

    #[test]
    fn test_edit_waits_for_debounce_window() {
        let mut s = scheduler();
        let start = Instant::now();
        s.on_edit("a.js", "text", start);

        assert!(s.poll(start).is_empty());
        assert!(s.poll(start + Duration::from_millis(299)).is_empty());
        let fired = s.poll(start + Duration::from_millis(300));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].text, "text");
    }

    #[test]
    fn test_rapid_edits_coalesce_to_newest_text() {
        let mut s = scheduler();
        let start = Instant::now();
        s.on_edit("a.js", "v1", start);
        s.on_edit("a.js", "v2", start + Duration::from_millis(100));
        s.on_edit("a.js", "v3", start + Duration::from_millis(200));

        // The window restarted at 200ms; nothing fires at 400ms.
        assert!(s.poll(start + Duration::from_millis(400)).is_empty());

        let fired = s.poll(start + Duration::from_millis(500));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].text, "v3");
        // Nothing left afterwards.
        assert!(s.poll(start + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn test_focus_fires_immediately() {
        let mut s = scheduler();
        let start = Instant::now();
        s.on_focus("a.js", "text", start);
        assert_eq!(s.poll(start).len(), 1);
    }

    #[test]
    fn test_oversized_buffer_skipped_and_pending_dropped() {
        let mut s = scheduler();
        let start = Instant::now();
        s.on_edit("a.js", "small", start);

        let big = "x".repeat(2000);
        assert_eq!(
            s.on_edit("a.js", &big, start),
            ScheduleOutcome::SkippedOversized
        );
        // The earlier pending scan of stale text is gone too.
        assert!(s.poll(start + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn test_stale_task_is_not_current() {
        let mut s = scheduler();
        let start = Instant::now();
        s.on_edit("a.js", "v1", start);
        let fired = s.poll(start + Duration::from_millis(300));
        assert_eq!(fired.len(), 1);
        assert!(s.is_current(&fired[0]));

        // A newer edit arrives while the fired task is "in flight".
        s.on_edit("a.js", "v2", start + Duration::from_millis(400));
        assert!(!s.is_current(&fired[0]));
    }

    #[test]
    fn test_buffers_are_independent() {
        let mut s = scheduler();
        let start = Instant::now();
        s.on_edit("a.js", "a", start);
        s.on_edit("b.js", "b", start + Duration::from_millis(200));

        let first = s.poll(start + Duration::from_millis(300));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].buffer_id, "a.js");

        let second = s.poll(start + Duration::from_millis(500));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].buffer_id, "b.js");
    }

    #[test]
    fn test_cancel_all_invalidates_in_flight_results() {
        let mut s = scheduler();
        let start = Instant::now();
        s.on_edit("a.js", "v1", start);
        let fired = s.poll(start + Duration::from_millis(300));

        s.on_edit("a.js", "v2", start + Duration::from_millis(400));
        s.cancel_all();

        assert!(!s.is_current(&fired[0]));
        assert!(s.poll(start + Duration::from_secs(10)).is_empty());
    }
}
