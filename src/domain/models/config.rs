//! Engine configuration tree.
//!
//! Loaded hierarchically by `infrastructure::config::ConfigLoader`:
//! defaults, then project yaml, then `SITEMENDER_*` environment variables.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub remediation: RemediationConfig,
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,
}

/// SQLite connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: ".sitemender/sitemender.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Knobs for the remediation run itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemediationConfig {
    /// Days an issue stays out of fixable queries after being fixed
    pub cooldown_days: u32,
    /// Most-recent published items fetched per remote collection
    pub content_window: usize,
    /// Seconds to wait before re-scoring, letting remote caches settle
    pub propagation_delay_secs: u64,
    /// Ceiling on the simulated score improvement in dry runs
    pub max_estimated_improvement: f64,
    /// `fixing` issues older than this many minutes are considered stale
    /// leftovers from a crashed run; fresher ones trigger an overlap warning
    pub stale_fixing_minutes: i64,
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self {
            cooldown_days: 7,
            content_window: 10,
            propagation_delay_secs: 2,
            max_estimated_improvement: 40.0,
            stale_fixing_minutes: 10,
        }
    }
}

/// Text generation provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Provider ids in priority order
    pub priority: Vec<String>,
    pub anthropic: ProviderConfig,
    pub openai: ProviderConfig,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            priority: vec!["anthropic".to_string(), "openai".to_string()],
            anthropic: ProviderConfig {
                api_key: None,
                model: "claude-sonnet-4-5-20250929".to_string(),
                base_url: None,
            },
            openai: ProviderConfig {
                api_key: None,
                model: "gpt-4o-mini".to_string(),
                base_url: None,
            },
            timeout_secs: 60,
        }
    }
}

/// Per-provider credentials and model selection.
///
/// `api_key: None` falls back to the provider's environment variable;
/// if that is absent too, the provider is treated as unavailable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
}

/// Logging output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
