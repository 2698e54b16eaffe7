// src/environment.rs
use crate::utils::resolve_path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
    #[serde(default = "default_rules_path")]
    pub rules_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_rules_path() -> PathBuf {
    PathBuf::from("rules.toml")
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            rules_path: default_rules_path(),
        }
    }
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        Self::load_from_file(Path::new(CONFIG_FILE), &environment)
    }

    pub fn get_environment() -> String {
        std::env::var("JOB_CHECKER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Read the section for `environment` from a YAML file; a missing file means defaults
    pub fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        let env_config = if config_path.exists() {
            let config_content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;

            let config_file: ConfigFile = serde_yaml::from_str(&config_content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;

            match environment {
                "production" => config_file.production,
                _ => config_file.local,
            }
        } else {
            info!(
                "{} not found, using default paths",
                config_path.display()
            );
            Self::default()
        };

        // Make paths absolute
        Ok(Self {
            model_dir: resolve_path(&env_config.model_dir)?,
            rules_path: resolve_path(&env_config.rules_path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
local:
  model_dir: models
production:
  model_dir: /app/models
  rules_path: /app/rules.toml
"#;

    #[test]
    fn test_selects_environment_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let production = EnvironmentConfig::load_from_file(file.path(), "production").unwrap();
        assert_eq!(production.model_dir, PathBuf::from("/app/models"));
        assert_eq!(production.rules_path, PathBuf::from("/app/rules.toml"));

        let local = EnvironmentConfig::load_from_file(file.path(), "staging").unwrap();
        assert!(local.model_dir.is_absolute());
        assert!(local.model_dir.ends_with("models"));
        assert!(local.rules_path.ends_with("rules.toml"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            EnvironmentConfig::load_from_file(Path::new("/nonexistent/config.yaml"), "local")
                .unwrap();
        assert!(config.model_dir.ends_with("models"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "local: [not, a, map").unwrap();
        assert!(EnvironmentConfig::load_from_file(file.path(), "local").is_err());
    }
}
