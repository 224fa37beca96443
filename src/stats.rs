//! Run-level timing statistics.
//!
//! A single `RunStats` accumulator is owned by the supervisor and updated
//! after every completed iteration; the derived figures back the per-iteration
//! timing report.

use std::time::Duration;

/// Aggregate timing for one run.
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    iterations_completed: u32,
    total_elapsed: Duration,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed iteration.
    pub fn record(&mut self, elapsed: Duration) {
        self.iterations_completed += 1;
        self.total_elapsed += elapsed;
    }

    pub fn iterations_completed(&self) -> u32 {
        self.iterations_completed
    }

    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    /// Average duration of a completed iteration.
    pub fn average(&self) -> Duration {
        if self.iterations_completed == 0 {
            Duration::ZERO
        } else {
            self.total_elapsed / self.iterations_completed
        }
    }

    /// Projected time to spend the rest of the budget at the current average.
    pub fn estimated_remaining(&self, max_iterations: u32) -> Duration {
        let remaining = max_iterations.saturating_sub(self.iterations_completed);
        self.average() * remaining
    }

    /// Elapsed time so far plus the projected remainder.
    pub fn estimated_total(&self, max_iterations: u32) -> Duration {
        self.total_elapsed + self.estimated_remaining(max_iterations)
    }
}
