use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use drover::agent::CommandAgent;
use drover::config::Config;
use drover::report::Reporter;
use drover::runner::{RunConfig, Supervisor};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("drover")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("drover.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Fold CLI overrides into the run config from the config file.
fn build_run_config(cli: &Cli, config: &Config) -> RunConfig {
    let mut run = RunConfig::from_config(config);

    if let Some(iterations) = cli.iterations {
        run.max_iterations = iterations;
    }
    if let Some(prompt) = &cli.prompt {
        run.prompt_path = prompt.clone();
    }
    if let Some(context) = &cli.context {
        run.context_path = Some(context.clone());
    }
    if let Some(agent) = &cli.agent {
        run.agent_command = agent.clone();
    }

    run
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let run_config = build_run_config(&cli, &config);

    if cli.is_verbose() {
        println!(
            "{}",
            format!(
                "agent: {} {}",
                run_config.agent_command,
                run_config.agent_args.join(" ")
            )
            .yellow()
        );
        println!(
            "{}",
            format!("prompt: {}", run_config.prompt_path.display()).yellow()
        );
    }

    info!(
        "Starting run: up to {} iterations of '{}'",
        run_config.max_iterations, run_config.agent_command
    );

    let reporter = Reporter::stdout();
    let agent = Arc::new(CommandAgent::new(
        run_config.agent_command.clone(),
        run_config.agent_args.clone(),
    ));
    let mut supervisor = Supervisor::new(&run_config, agent, reporter);

    match supervisor.run().await {
        Ok(result) => {
            info!("Run finished: {:?}", result);
            std::process::exit(result.exit_code());
        }
        Err(e) => {
            // Precondition failure: nothing was started, nothing to unwind
            reporter.configuration_error(&e.to_string());
            std::process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_run_config_defaults() {
        let cli = Cli::try_parse_from(["drover"]).unwrap();
        let config = Config::default();

        let run = build_run_config(&cli, &config);
        assert_eq!(run.max_iterations, 10);
        assert_eq!(run.prompt_path, PathBuf::from("PROMPT.md"));
        assert_eq!(run.agent_command, "claude");
    }

    #[test]
    fn test_build_run_config_cli_overrides() {
        let cli = Cli::try_parse_from(["drover", "7", "--prompt", "TASK.md", "--agent", "fake"]).unwrap();
        let config = Config::default();

        let run = build_run_config(&cli, &config);
        assert_eq!(run.max_iterations, 7);
        assert_eq!(run.prompt_path, PathBuf::from("TASK.md"));
        assert_eq!(run.agent_command, "fake");
        // Context stays at the config default when not overridden
        assert_eq!(run.context_path, Some(PathBuf::from("CONTEXT.md")));
    }
}
