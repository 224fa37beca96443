//! The loop supervisor.
//!
//! One `run` call drives a whole run: assemble the payload fresh, invoke
//! the agent, record timing, scan the output for the completion promise,
//! re-check that the agent has not deleted its own instructions, and loop
//! until a terminal outcome. A run moves NotStarted -> Iterating -> exactly
//! one of {Completed, Exhausted, Aborted}; terminal states are absorbing.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use log::{debug, info, warn};

use crate::agent::AgentInvoker;
use crate::config::Config;
use crate::error::{DroverError, Result};
use crate::marker::find_promise;
use crate::prompt::PayloadAssembler;
use crate::report::Reporter;
use crate::stats::RunStats;

/// Terminal outcome of a run. Produced exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationResult {
    /// The agent emitted a completion promise; carries its value verbatim
    Completed(String),
    /// Iteration budget spent without a promise; a normal outcome, not an error
    Exhausted,
    /// A safety check or launch failure stopped the run mid-flight
    Aborted(String),
}

impl TerminationResult {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            TerminationResult::Completed(_) => 0,
            TerminationResult::Exhausted => 1,
            TerminationResult::Aborted(_) => 2,
        }
    }
}

/// Immutable inputs for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub max_iterations: u32,
    pub prompt_path: PathBuf,
    pub context_path: Option<PathBuf>,
    pub agent_command: String,
    pub agent_args: Vec<String>,
}

impl RunConfig {
    /// Build a run config from the loaded application config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_iterations: config.run.max_iterations,
            prompt_path: config.prompt.primary.clone(),
            context_path: config.prompt.context.clone(),
            agent_command: config.agent.command.clone(),
            agent_args: config.agent.args.clone(),
        }
    }
}

/// Transient record of one iteration.
///
/// Dropped after the decision step, so captured output never accumulates
/// across a run; only the aggregate stats are carried forward.
#[derive(Debug)]
struct IterationRecord {
    iteration: u32,
    elapsed: Duration,
    output: String,
}

/// Drives a bounded run of agent iterations to a single terminal outcome.
pub struct Supervisor<A: AgentInvoker> {
    agent: Arc<A>,
    assembler: PayloadAssembler,
    reporter: Reporter,
    max_iterations: u32,
    stats: RunStats,
}

impl<A: AgentInvoker> Supervisor<A> {
    pub fn new(config: &RunConfig, agent: Arc<A>, reporter: Reporter) -> Self {
        Self {
            agent,
            assembler: PayloadAssembler::new(config.prompt_path.clone(), config.context_path.clone()),
            reporter,
            max_iterations: config.max_iterations,
            stats: RunStats::new(),
        }
    }

    /// Timing for the completed iterations of this run.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Run until the agent promises completion, the budget is spent, or a
    /// safety check trips.
    ///
    /// Fails with `DroverError::Configuration` before any iteration if the
    /// primary instruction document is missing; the agent is never invoked
    /// in that case.
    pub async fn run(&mut self) -> Result<TerminationResult> {
        if !self.assembler.primary_exists() {
            return Err(DroverError::Configuration(format!(
                "instruction document not found: {}",
                self.assembler.primary_path().display()
            )));
        }

        for iteration in 1..=self.max_iterations {
            self.reporter
                .iteration_start(iteration, self.max_iterations, Local::now());

            // Fresh read every iteration; the agent may have edited either
            // document during the previous one.
            let payload = match self.assembler.assemble() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("payload assembly failed on iteration {}: {}", iteration, e);
                    return Ok(self.abort("prompt file missing"));
                }
            };
            debug!("iteration {}: payload is {} bytes", iteration, payload.len());

            let started = Instant::now();
            let output = match self.agent.invoke(&payload).await {
                Ok(output) => output,
                Err(DroverError::Invocation(reason)) => {
                    warn!("agent launch failed on iteration {}: {}", iteration, reason);
                    return Ok(self.abort(&format!("invocation failed: {}", reason)));
                }
                Err(e) => return Err(e),
            };

            let record = IterationRecord {
                iteration,
                elapsed: started.elapsed(),
                output,
            };

            self.stats.record(record.elapsed);
            info!(
                "iteration {}/{} finished in {:?}",
                record.iteration, self.max_iterations, record.elapsed
            );

            self.reporter.agent_output(&record.output);
            self.reporter.timing(record.elapsed, &self.stats, self.max_iterations);

            if let Some(value) = find_promise(&record.output) {
                let value = value.to_string();
                self.reporter.completed(&value);
                return Ok(TerminationResult::Completed(value));
            }

            // The agent is untrusted and may have deleted its own
            // instructions as a side effect.
            if !self.assembler.primary_exists() {
                return Ok(self.abort("prompt file missing"));
            }
        }

        self.reporter.exhausted(self.max_iterations);
        Ok(TerminationResult::Exhausted)
    }

    fn abort(&self, reason: &str) -> TerminationResult {
        self.reporter.aborted(reason);
        TerminationResult::Aborted(reason.to_string())
    }
}
