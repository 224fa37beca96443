//! External agent invocation.

pub mod invoker;

pub use invoker::{AgentInvoker, CommandAgent, MockAgent};
