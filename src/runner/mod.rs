//! Loop supervision - drives the iterate, invoke, inspect, decide cycle.

pub mod supervisor;

pub use supervisor::{RunConfig, Supervisor, TerminationResult};
