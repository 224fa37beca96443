//! Human-readable run reporting.
//!
//! Everything here is observational: iteration headers, timing, the captured
//! agent output, and one of four clearly distinguishable termination
//! banners. The only contract is that the `Completed` banner carries the
//! promise value verbatim.

use std::time::Duration;

use chrono::{DateTime, Local};
use colored::*;

use crate::stats::RunStats;

/// Progress reporter writing to stdout.
///
/// `silent()` suppresses all output so library callers and tests can run
/// the supervisor without spamming the terminal.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    enabled: bool,
}

impl Reporter {
    pub fn stdout() -> Self {
        Self { enabled: true }
    }

    pub fn silent() -> Self {
        Self { enabled: false }
    }

    pub fn iteration_start(&self, iteration: u32, max: u32, started_at: DateTime<Local>) {
        if !self.enabled {
            return;
        }
        println!();
        println!(
            "{}",
            format!(
                "=== Iteration {}/{} started {} ===",
                iteration,
                max,
                started_at.format("%H:%M:%S")
            )
            .cyan()
            .bold()
        );
    }

    pub fn agent_output(&self, output: &str) {
        if !self.enabled {
            return;
        }
        println!("{}", output);
    }

    pub fn timing(&self, last: Duration, stats: &RunStats, max: u32) {
        if !self.enabled {
            return;
        }
        println!("{}", "Timing:".cyan());
        println!("  iteration: {}", format_duration(last));
        println!("  elapsed:   {}", format_duration(stats.total_elapsed()));
        println!("  average:   {}", format_duration(stats.average()));
        println!(
            "  remaining: {} (estimated)",
            format_duration(stats.estimated_remaining(max))
        );
        println!(
            "  total:     {} (estimated)",
            format_duration(stats.estimated_total(max))
        );
    }

    pub fn completed(&self, value: &str) {
        if !self.enabled {
            return;
        }
        println!();
        println!("{}", "COMPLETED: promise received".green().bold());
        println!("  {}", value);
    }

    pub fn exhausted(&self, max: u32) {
        if !self.enabled {
            return;
        }
        println!();
        println!(
            "{}",
            format!("EXHAUSTED: no promise after {} iterations", max)
                .yellow()
                .bold()
        );
    }

    pub fn aborted(&self, reason: &str) {
        if !self.enabled {
            return;
        }
        println!();
        println!("{}", format!("ABORTED: {}", reason).red().bold());
    }

    pub fn configuration_error(&self, message: &str) {
        if !self.enabled {
            return;
        }
        println!("{}", format!("CONFIGURATION ERROR: {}", message).red().bold());
    }
}

/// Render a duration as `MmSSs` above a minute, fractional seconds below.
fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}
