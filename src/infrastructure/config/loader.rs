use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "missing API key - set ANTHROPIC_API_KEY (or api_key in .promptforge/config.yaml)"
    )]
    MissingApiKey,

    #[error("invalid temperature: {0}. Must be between 0.0 and 1.0")]
    InvalidTemperature(f32),

    #[error("invalid max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    #[error("base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    #[error("invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error(
        "invalid backoff configuration: initial_backoff_ms ({0}) must be <= max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .promptforge/config.yaml (project config)
    /// 3. .promptforge/local.yaml (project local overrides, optional)
    /// 4. Environment variables (`PROMPTFORGE_*` prefix, highest priority)
    ///
    /// `ANTHROPIC_API_KEY` is honored as the conventional credential source
    /// when no explicit api_key has been configured.
    pub fn load() -> Result<Config> {
        let mut config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".promptforge/config.yaml"))
            .merge(Yaml::file(".promptforge/local.yaml"))
            .merge(Env::prefixed("PROMPTFORGE_").split("__"))
            .extract()
            .context("failed to extract configuration from figment")?;

        if config.api_key.is_empty() {
            if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
                config.api_key = key;
            }
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        if !(0.0..=1.0).contains(&config.temperature) {
            return Err(ConfigError::InvalidTemperature(config.temperature));
        }

        if config.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(config.max_tokens));
        }

        if config.base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        if config.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.timeout_secs));
        }

        if config.rate_limit.requests_per_second <= 0.0 {
            return Err(ConfigError::InvalidRateLimit(
                config.rate_limit.requests_per_second,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.retry.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(config.retry.max_retries));
        }

        if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn valid_config() -> Config {
        Config {
            api_key: "test-key".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_validate_accepts_defaults_with_key() {
        assert!(ConfigLoader::validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_api_key() {
        let config = Config::default();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let mut config = valid_config();
        config.temperature = 1.5;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let mut config = valid_config();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_backoff() {
        let mut config = valid_config();
        config.retry.initial_backoff_ms = 10_000;
        config.retry.max_backoff_ms = 1_000;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBackoff(_, _))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
api_key: file-key
model: claude-3-opus-20240229
temperature: 0.3
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{yaml}").unwrap();

        let config = ConfigLoader::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.model, "claude-3-opus-20240229");
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        // Unspecified fields fall back to defaults
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let yaml = "api_key: file-key\ntemperature: 2.0\n";
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{yaml}").unwrap();

        assert!(ConfigLoader::load_from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_env_fallback_for_api_key() {
        temp_env::with_vars(
            [
                ("ANTHROPIC_API_KEY", Some("env-key")),
                ("PROMPTFORGE_MODEL", Some("claude-3-haiku-20240307")),
            ],
            || {
                let config = ConfigLoader::load().unwrap();
                assert_eq!(config.api_key, "env-key");
                assert_eq!(config.model, "claude-3-haiku-20240307");
            },
        );
    }

    #[test]
    fn test_prefixed_env_overrides_win() {
        temp_env::with_vars(
            [
                ("ANTHROPIC_API_KEY", Some("env-key")),
                ("PROMPTFORGE_TEMPERATURE", Some("0.1")),
            ],
            || {
                let config = ConfigLoader::load().unwrap();
                assert!((config.temperature - 0.1).abs() < f32::EPSILON);
            },
        );
    }
}
