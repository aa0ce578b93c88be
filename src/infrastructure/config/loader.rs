use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid content_window: {0}. Must be between 1 and 50")]
    InvalidContentWindow(usize),

    #[error("Invalid cooldown_days: {0}. Must be at least 1")]
    InvalidCooldownDays(u32),

    #[error("Unknown generation provider: {0}. Must be one of: anthropic, openai")]
    UnknownProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .sitemender/config.yaml (project config)
    /// 3. .sitemender/local.yaml (project local overrides, optional)
    /// 4. Environment variables (SITEMENDER_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".sitemender/config.yaml"))
            .merge(Yaml::file(".sitemender/local.yaml"))
            .merge(Env::prefixed("SITEMENDER_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

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
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
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

        // The remote content API caps listings at 50 items per page.
        if config.remediation.content_window == 0 || config.remediation.content_window > 50 {
            return Err(ConfigError::InvalidContentWindow(
                config.remediation.content_window,
            ));
        }

        if config.remediation.cooldown_days == 0 {
            return Err(ConfigError::InvalidCooldownDays(
                config.remediation.cooldown_days,
            ));
        }

        if config.generation.priority.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "generation.priority cannot be empty".to_string(),
            ));
        }

        let known_providers = ["anthropic", "openai"];
        for provider in &config.generation.priority {
            if !known_providers.contains(&provider.as_str()) {
                return Err(ConfigError::UnknownProvider(provider.clone()));
            }
        }

        Ok(())
    }
}
