use std::path::Path;

use crate::ai::AgentConfig;
use crate::error::ConfigError;
use crate::training::TrainingConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub training: TrainingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!("Warning: config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.agent.validate()?;
        self.training.validate()?;
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[agent]
learning_rate = 0.25
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.agent.learning_rate - 0.25).abs() < 1e-9);
        // Other fields should be defaults
        assert!((config.agent.discount_factor - 0.95).abs() < 1e-9);
        assert_eq!(config.training.episodes, 10_000);
        assert_eq!(config.training.seed, None);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        let default = AppConfig::default();
        assert_eq!(config.agent, default.agent);
        assert_eq!(config.training.episodes, default.training.episodes);
        assert_eq!(config.training.model_path, default.training.model_path);
    }

    #[test]
    fn test_validation_rejects_zero_episodes() {
        let mut config = AppConfig::default();
        config.training.episodes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_out_of_range_lr() {
        let mut config = AppConfig::default();
        config.agent.learning_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_invalid_gamma() {
        let mut config = AppConfig::default();
        config.agent.discount_factor = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_min_epsilon_gt_initial() {
        let mut config = AppConfig::default();
        config.agent.initial_epsilon = 0.1;
        config.agent.min_epsilon = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_log_interval() {
        let mut config = AppConfig::default();
        config.training.log_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.training.episodes, 10_000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[training]
episodes = 500
seed = 9
model_path = "out/q.json"
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.training.episodes, 500);
        assert_eq!(config.training.seed, Some(9));
        assert_eq!(config.training.model_path, Path::new("out/q.json"));
        // Others are defaults
        assert!((config.agent.learning_rate - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[agent]\nepsilon_decay = 0.0\n").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got: {err}");
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[training\nepisodes = ").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)), "got: {err}");
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert!(toml_str.contains("[agent]"));
        assert!(toml_str.contains("[training]"));
    }
}
