use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub agent: AgentConfig,
    pub prompt: PromptConfig,
    pub run: RunDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Command to invoke for each iteration
    pub command: String,
    /// Fixed arguments passed before the payload; the unattended flag lives here
    pub args: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            args: vec!["--dangerously-skip-permissions".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Primary instruction document, required at run start
    pub primary: PathBuf,
    /// Optional context document, prepended when present
    pub context: Option<PathBuf>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            primary: PathBuf::from("PROMPT.md"),
            context: Some(PathBuf::from("CONTEXT.md")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunDefaults {
    /// Iteration budget when no count is given on the command line
    pub max_iterations: u32,
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self { max_iterations: 10 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            agent: AgentConfig::default(),
            prompt: PromptConfig::default(),
            run: RunDefaults::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.agent.command, "claude");
        assert_eq!(config.agent.args, vec!["--dangerously-skip-permissions"]);
        assert_eq!(config.prompt.primary, PathBuf::from("PROMPT.md"));
        assert_eq!(config.prompt.context, Some(PathBuf::from("CONTEXT.md")));
        assert_eq!(config.run.max_iterations, 10);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drover.yml");
        fs::write(
            &path,
            r#"
agent:
  command: fake-agent
  args: ["--yes"]
prompt:
  primary: instructions.md
run:
  max_iterations: 3
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.agent.command, "fake-agent");
        assert_eq!(config.agent.args, vec!["--yes"]);
        assert_eq!(config.prompt.primary, PathBuf::from("instructions.md"));
        assert_eq!(config.run.max_iterations, 3);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drover.yml");
        fs::write(&path, "run:\n  max_iterations: 25\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.run.max_iterations, 25);
        assert_eq!(config.agent.command, "claude");
        assert_eq!(config.prompt.primary, PathBuf::from("PROMPT.md"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = PathBuf::from("/nonexistent/drover.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drover.yml");
        fs::write(&path, "agent: [not a mapping").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }
}
