//! Agent invocation - one subprocess per iteration.
//!
//! The agent is an opaque, untrusted command. Its documented contract is
//! narrow: it takes the full payload as a single argument (it rejects
//! streamed input), runs to completion on its own schedule, and returns
//! text. Anything satisfying that contract can stand in for it.

use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{DroverError, Result};

/// Seam for invoking the external agent once per iteration.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    /// Run the agent with the given payload and return its combined
    /// stdout + stderr output. Blocks until the agent exits; the agent
    /// manages its own completion, so there is no timeout here.
    async fn invoke(&self, payload: &str) -> Result<String>;
}

/// Agent invoker backed by a real subprocess.
///
/// The payload is appended as the final argument after the configured fixed
/// args (which carry the unattended/no-confirmation flag).
pub struct CommandAgent {
    command: String,
    args: Vec<String>,
}

impl CommandAgent {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl AgentInvoker for CommandAgent {
    async fn invoke(&self, payload: &str) -> Result<String> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args).arg(payload);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        // An operator interrupt must not orphan an in-flight agent
        cmd.kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            DroverError::Invocation(format!("failed to launch '{}': {}", self.command, e))
        })?;

        let output = child.wait_with_output().await?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

/// Scripted invoker for tests.
///
/// Pops one canned response per call; once the script is spent it keeps
/// returning the fallback text, so budget-exhaustion paths can run for any
/// iteration count.
pub struct MockAgent {
    responses: Mutex<VecDeque<String>>,
    fallback: String,
    calls: AtomicU32,
}

impl MockAgent {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback: "working...".to_string(),
            calls: AtomicU32::new(0),
        }
    }

    /// A mock that returns the same output on every call.
    pub fn always(response: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: response.into(),
            calls: AtomicU32::new(0),
        }
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgentInvoker for MockAgent {
    async fn invoke(&self, _payload: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        Ok(responses.pop_front().unwrap_or_else(|| self.fallback.clone()))
    }
}
