// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::path::PathBuf;

use config::{Config, Map};
pub use config::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "lottery.toml";
pub const DEFAULT_STATE_DIR: &str = "lottery.state";
pub const ENV_PREFIX: &str = "LOTTERY";

/// Operator configuration: `lottery.toml` (optional) overlaid by `LOTTERY_*` env vars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Fixed rng seed for reproducible sessions; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_preview_len")]
    pub preview_len: usize,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_DIR)
}

fn default_preview_len() -> usize {
    20
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            seed: None,
            preview_len: default_preview_len(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// `env` replaces the process environment as the source of `LOTTERY_*` overrides.
    pub fn load_with_env(
        path: &str,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;
        let config: Self = settings.try_deserialize()?;
        if config.preview_len == 0 {
            return Err(ConfigError::Message(
                "preview_len must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.state_dir, PathBuf::from(DEFAULT_STATE_DIR));
        assert_eq!(config.preview_len, 20);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lottery.toml");
        fs::write(&path, "state_dir = \"/tmp/draws\"\nseed = 99\npreview_len = 5\n").unwrap();
        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.state_dir, PathBuf::from("/tmp/draws"));
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.preview_len, 5);
    }

    #[test]
    fn env_overrides_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lottery.toml");
        fs::write(&path, "state_dir = \"/tmp/draws\"\nseed = 99\npreview_len = 5\n").unwrap();
        let env = Map::from([
            ("LOTTERY_PREVIEW_LEN".to_string(), "7".to_string()),
            ("LOTTERY_SEED".to_string(), "11".to_string()),
            ("OTHER_STATE_DIR".to_string(), "/ignored".to_string()),
        ]);

        let config = AppConfig::load_with_env(path.to_str().unwrap(), Some(env)).unwrap();
        assert_eq!(config.preview_len, 7);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/draws"));
    }

    #[test]
    fn env_state_dir_applies_without_a_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let env = Map::from([("LOTTERY_STATE_DIR".to_string(), "/srv/lottery".to_string())]);
        let config = AppConfig::load_with_env(path.to_str().unwrap(), Some(env)).unwrap();
        assert_eq!(config.state_dir, PathBuf::from("/srv/lottery"));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn zero_preview_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lottery.toml");
        fs::write(&path, "preview_len = 0\n").unwrap();
        assert!(AppConfig::load_from(path.to_str().unwrap()).is_err());
    }
}
