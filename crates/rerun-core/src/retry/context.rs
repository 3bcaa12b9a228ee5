//! Per-call attempt bookkeeping.

use std::time::Duration;

/// State owned by a single `run_with_retry` call and dropped when it resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptContext {
    attempt: u32,
    backoff_elapsed: Duration,
}

impl AttemptContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current attempt index (0 = first attempt).
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Total time spent waiting in backoff so far.
    pub fn backoff_elapsed(&self) -> Duration {
        self.backoff_elapsed
    }

    /// Record a completed backoff wait and move on to the next attempt.
    pub fn record_backoff(&mut self, delay: Duration) {
        self.backoff_elapsed = self.backoff_elapsed.saturating_add(delay);
        self.attempt += 1;
    }
}
