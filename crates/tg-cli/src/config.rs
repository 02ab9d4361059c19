//! Configuration loading for the TrustGuard CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tg_core::RiskWeights;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Risk scoring weight overrides.
    #[serde(default)]
    pub weights: RiskWeights,
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a YAML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_yaml::to_string(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.logging.level()?;
        self.weights
            .validate()
            .map_err(|reason| anyhow::anyhow!("Invalid risk weights: {reason}"))?;
        Ok(())
    }
}

/// Logging section of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level name (trace, debug, info, warn, error).
    #[serde(default = "default_level")]
    pub level: String,

    /// Whether to emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl LoggingSettings {
    /// Parses the configured level name.
    pub fn level(&self) -> Result<tracing::Level> {
        self.level
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid log level: {}", self.level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.weights, RiskWeights::default());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trustguard.yaml");

        let mut config = AppConfig::default();
        config.logging.level = "debug".to_string();
        config.weights.high_threshold = 70;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.weights.high_threshold, 70);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trustguard.yaml");
        std::fs::write(&path, "logging:\n  level: warn\n").unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.logging.level, "warn");
        assert!(!loaded.logging.json);
        assert_eq!(loaded.weights, RiskWeights::default());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trustguard.yaml");
        std::fs::write(
            &path,
            "weights:\n  high_threshold: 20\n  medium_threshold: 40\n",
        )
        .unwrap();

        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_invalid_level_rejected() {
        let config = AppConfig {
            logging: LoggingSettings {
                level: "loud".to_string(),
                json: false,
            },
            weights: RiskWeights::default(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = AppConfig::load(Path::new("/nonexistent/trustguard.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
