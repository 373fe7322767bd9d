//! Daemon state management.
//!
//! All process-wide mutable state lives here, constructed explicitly at
//! startup and passed by reference into the pipeline. Nothing in the
//! engine reaches for module-level singletons.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use vera_common::llm::{DisabledModel, HttpLanguageModel, LanguageModel};
use vera_common::retry::RetryPolicy;
use vera_common::safety::RateLimiter;

use crate::catalog::CatalogStore;
use crate::config::Config;

/// Shared engine state.
pub struct AppState {
    pub config: Config,
    pub catalog: CatalogStore,
    pub rate_limiter: RateLimiter,
    pub llm: Arc<dyn LanguageModel>,
    pub retry: RetryPolicy,
}

impl AppState {
    /// Full startup: load the catalog from disk and wire the configured
    /// LLM backend.
    pub fn init(config: Config) -> Result<Self> {
        let catalog = CatalogStore::load(Path::new(&config.catalog.path))
            .context("catalog load failed")?;

        let llm: Arc<dyn LanguageModel> = if config.llm.enabled {
            Arc::new(
                HttpLanguageModel::new(&config.llm.endpoint, &config.llm.model, config.llm.timeout_secs)
                    .map_err(|e| anyhow::anyhow!("LLM client init failed: {}", e))?,
            )
        } else {
            Arc::new(DisabledModel)
        };

        Ok(Self::with_parts(config, catalog, llm))
    }

    /// Assemble state from pre-built parts (tests inject fakes here).
    pub fn with_parts(config: Config, catalog: CatalogStore, llm: Arc<dyn LanguageModel>) -> Self {
        let rate_limiter = RateLimiter::new(
            config.rate_limit.max_requests,
            Duration::from_secs(config.rate_limit.window_secs),
        );
        let retry = RetryPolicy {
            max_retries: config.llm.max_retries,
            initial_delay: Duration::from_millis(config.llm.initial_backoff_ms),
            max_delay: Duration::from_millis(config.llm.max_backoff_ms),
            backoff_multiplier: 2,
        };

        Self {
            config,
            catalog,
            rate_limiter,
            llm,
            retry,
        }
    }
}

/// Periodic rate-limit store eviction. Runs on its own task so request
/// handling never waits on it.
pub fn spawn_sweeper(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs(state.config.rate_limit.sweep_interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately; skip it
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = state.rate_limiter.sweep();
            if removed > 0 {
                debug!(removed, "rate-limit sweep evicted idle clients");
            }
        }
    })
}
