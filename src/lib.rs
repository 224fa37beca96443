//! Drover - a bounded supervision loop for unattended CLI agents
//!
//! Drover repeatedly invokes an external agent with a freshly assembled
//! instruction payload until the agent emits a completion promise, the
//! iteration budget is spent, or a safety check trips.

pub mod agent;
pub mod config;
pub mod error;
pub mod marker;
pub mod prompt;
pub mod report;
pub mod runner;
pub mod stats;

pub use error::{DroverError, Result};
pub use runner::{RunConfig, Supervisor, TerminationResult};
