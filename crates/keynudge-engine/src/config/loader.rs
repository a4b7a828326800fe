use super::schema::{KeynudgeConfig, config_dir};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./keynudge.yaml
    /// 2. ~/.keynudge/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<KeynudgeConfig, ConfigError> {
        let local_config = PathBuf::from("./keynudge.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        let home_config = config_dir().join("config.yaml");
        if home_config.exists() {
            return Self::load_from(&home_config).await;
        }

        Ok(KeynudgeConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<KeynudgeConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(KeynudgeConfig::default());
        }
        let config: KeynudgeConfig = serde_yaml::from_str(&content)?;
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &KeynudgeConfig) -> Result<(), ConfigError> {
    let bias = config.recommendations.first_candidate_bias;
    if !(0.0..=1.0).contains(&bias) {
        return Err(ConfigError::Invalid(format!(
            "recommendations.first_candidate_bias must be between 0 and 1, got {}",
            bias
        )));
    }
    Ok(())
}
