//! End-to-end supervision runs against real subprocesses.
//!
//! These use small shell commands as stand-in agents: anything that accepts
//! one argument and prints text satisfies the agent contract.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use drover::agent::CommandAgent;
use drover::report::Reporter;
use drover::runner::{RunConfig, Supervisor, TerminationResult};
use drover::DroverError;
use tempfile::TempDir;

fn run_config(dir: &TempDir, max_iterations: u32) -> RunConfig {
    RunConfig {
        max_iterations,
        prompt_path: dir.path().join("PROMPT.md"),
        context_path: Some(dir.path().join("CONTEXT.md")),
        agent_command: "echo".to_string(),
        agent_args: vec![],
    }
}

fn write_prompt(dir: &TempDir, content: &str) {
    fs::write(dir.path().join("PROMPT.md"), content).unwrap();
}

/// An `echo` agent prints its payload back, so a promise placed in the
/// prompt document proves the payload actually contained the document.
#[tokio::test]
async fn test_echo_agent_payload_contains_prompt() {
    let dir = TempDir::new().unwrap();
    write_prompt(&dir, "please finish\n<promise>FROM_PROMPT</promise>");

    let config = run_config(&dir, 3);
    let agent = Arc::new(CommandAgent::new(config.agent_command.clone(), config.agent_args.clone()));
    let mut supervisor = Supervisor::new(&config, agent, Reporter::silent());

    let result = supervisor.run().await.unwrap();
    assert_eq!(result, TerminationResult::Completed("FROM_PROMPT".to_string()));
    assert_eq!(supervisor.stats().iterations_completed(), 1);
}

/// Context document goes first in the payload, so its marker wins over one
/// in the primary document.
#[tokio::test]
async fn test_context_document_precedes_instructions() {
    let dir = TempDir::new().unwrap();
    write_prompt(&dir, "<promise>PRIMARY</promise>");
    fs::write(dir.path().join("CONTEXT.md"), "<promise>CONTEXT</promise>").unwrap();

    let config = run_config(&dir, 2);
    let agent = Arc::new(CommandAgent::new(config.agent_command.clone(), config.agent_args.clone()));
    let mut supervisor = Supervisor::new(&config, agent, Reporter::silent());

    let result = supervisor.run().await.unwrap();
    assert_eq!(result, TerminationResult::Completed("CONTEXT".to_string()));
}

/// N=3, agent output never contains a promise: three invocations, then
/// exhaustion with a non-zero exit code.
#[tokio::test]
async fn test_marker_free_agent_exhausts_budget() {
    let dir = TempDir::new().unwrap();
    write_prompt(&dir, "no marker in here");

    let config = run_config(&dir, 3);
    let agent = Arc::new(CommandAgent::new(config.agent_command.clone(), config.agent_args.clone()));
    let mut supervisor = Supervisor::new(&config, agent, Reporter::silent());

    let result = supervisor.run().await.unwrap();
    assert_eq!(result, TerminationResult::Exhausted);
    assert_ne!(result.exit_code(), 0);
    assert_eq!(supervisor.stats().iterations_completed(), 3);
}

/// An agent that deletes the prompt file trips the safety check after its
/// first iteration; no second iteration is attempted.
#[tokio::test]
async fn test_destructive_agent_aborts_run() {
    let dir = TempDir::new().unwrap();
    write_prompt(&dir, "instructions");

    let prompt_path = dir.path().join("PROMPT.md");
    let config = RunConfig {
        max_iterations: 5,
        prompt_path: prompt_path.clone(),
        context_path: None,
        agent_command: "sh".to_string(),
        agent_args: vec![
            "-c".to_string(),
            format!("rm -f '{}'; echo gone", prompt_path.display()),
        ],
    };
    let agent = Arc::new(CommandAgent::new(config.agent_command.clone(), config.agent_args.clone()));
    let mut supervisor = Supervisor::new(&config, agent, Reporter::silent());

    let result = supervisor.run().await.unwrap();
    assert_eq!(result, TerminationResult::Aborted("prompt file missing".to_string()));
    assert_ne!(result.exit_code(), 0);
    assert_eq!(supervisor.stats().iterations_completed(), 1);
}

/// Missing primary document: configuration error, no subprocess spawned.
#[tokio::test]
async fn test_missing_prompt_never_starts() {
    let dir = TempDir::new().unwrap();

    let config = run_config(&dir, 3);
    let agent = Arc::new(CommandAgent::new(config.agent_command.clone(), config.agent_args.clone()));
    let mut supervisor = Supervisor::new(&config, agent, Reporter::silent());

    let result = supervisor.run().await;
    assert!(matches!(result, Err(DroverError::Configuration(_))));
    assert_eq!(supervisor.stats().iterations_completed(), 0);
}

/// An unlaunchable agent binary aborts the run with no retry.
#[tokio::test]
async fn test_unlaunchable_agent_aborts_run() {
    let dir = TempDir::new().unwrap();
    write_prompt(&dir, "instructions");

    let config = RunConfig {
        max_iterations: 3,
        prompt_path: dir.path().join("PROMPT.md"),
        context_path: None,
        agent_command: "definitely_not_a_real_agent_xyz".to_string(),
        agent_args: vec![],
    };
    let agent = Arc::new(CommandAgent::new(config.agent_command.clone(), config.agent_args.clone()));
    let mut supervisor = Supervisor::new(&config, agent, Reporter::silent());

    let result = supervisor.run().await.unwrap();
    match result {
        TerminationResult::Aborted(reason) => assert!(reason.contains("invocation failed")),
        other => panic!("expected Aborted, got {:?}", other),
    }
    assert_eq!(supervisor.stats().iterations_completed(), 0);
}

/// Edits the agent makes to the prompt between iterations are observed by
/// the next payload assembly.
#[tokio::test]
async fn test_prompt_edits_between_iterations_are_observed() {
    let dir = TempDir::new().unwrap();
    write_prompt(&dir, "keep going");

    let prompt_path: PathBuf = dir.path().join("PROMPT.md");
    // First iteration rewrites the prompt to contain a promise; the echo of
    // the second iteration's payload then completes the run.
    let config = RunConfig {
        max_iterations: 5,
        prompt_path: prompt_path.clone(),
        context_path: None,
        agent_command: "sh".to_string(),
        agent_args: vec![
            "-c".to_string(),
            format!(
                "echo \"$1\"; printf '<promise>REWRITTEN</promise>' > '{}'",
                prompt_path.display()
            ),
            "agent".to_string(),
        ],
    };
    let agent = Arc::new(CommandAgent::new(config.agent_command.clone(), config.agent_args.clone()));
    let mut supervisor = Supervisor::new(&config, agent, Reporter::silent());

    let result = supervisor.run().await.unwrap();
    assert_eq!(result, TerminationResult::Completed("REWRITTEN".to_string()));
    assert_eq!(supervisor.stats().iterations_completed(), 2);
}
