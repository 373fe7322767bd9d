//! Configuration management for verad.
//!
//! Loads settings from /etc/vera/config.toml or uses defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/vera/config.toml";

/// Rate limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Requests allowed per client per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Background sweep cadence in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_requests() -> u32 {
    20
}

fn default_sweep_interval() -> u64 {
    300
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether the external classifier/generator is used at all.
    /// When disabled every query goes through the rule engine.
    #[serde(default = "default_llm_enabled")]
    pub enabled: bool,

    /// Generation endpoint (Ollama-style API)
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Model used for both classification and generation
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Per-request timeout in seconds; bias toward the deterministic
    /// fallback rather than long waits
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// Maximum retry attempts for retryable failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff cap in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_llm_enabled() -> bool {
    true
}

fn default_llm_endpoint() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_llm_model() -> String {
    "qwen2.5:3b-instruct".to_string()
}

fn default_llm_timeout() -> u64 {
    8
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_ms() -> u64 {
    10_000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_llm_enabled(),
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            timeout_secs: default_llm_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Fuzzy resolver thresholds, per call site. Comparison lookups tolerate
/// weaker matches than single-item detail lookups; the asymmetry is
/// deliberate and load-bearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_compare_threshold")]
    pub compare_threshold: f32,

    #[serde(default = "default_details_threshold")]
    pub details_threshold: f32,
}

fn default_compare_threshold() -> f32 {
    0.4
}

fn default_details_threshold() -> f32 {
    0.6
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            compare_threshold: default_compare_threshold(),
            details_threshold: default_details_threshold(),
        }
    }
}

/// Catalog source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON file holding the catalog records
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

fn default_catalog_path() -> String {
    "/var/lib/vera/catalog.json".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Result list caps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Items included in a search response
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    5
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Config {
    /// Load from the default path, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Invalid config at {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config at {} - using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Persist the current configuration (used by installers).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_limits() {
        let config = Config::default();
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.rate_limit.max_requests, 20);
        assert_eq!(config.limits.max_results, 5);
        assert!(config.resolver.compare_threshold < config.resolver.details_threshold);
    }

    #[test]
    fn partial_config_fills_missing_fields() {
        let raw = r#"
            [rate_limit]
            max_requests = 5
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.llm.max_retries, 3);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/vera.toml"));
        assert_eq!(config.rate_limit.max_requests, 20);
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.limits.max_results = 7;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.limits.max_results, 7);
    }
}
