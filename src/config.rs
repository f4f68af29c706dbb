//! Runtime configuration for the dashboard
//!
//! Defaults come from `constants.rs`; `from_env` lets a deployment point at a
//! different API host, slow down polling or persist preferences somewhere
//! specific without recompiling.

use crate::constants::{
    COINGECKO_API_URL, MARKETS_PAGE_SIZE, NOTIFICATION_TTL_MS, REFRESH_INTERVAL_SECS,
};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Base URL of the CoinGecko-compatible API
pub const ENV_API_URL: &str = "CRYPTO_PREDICTOR_API_URL";
/// Refresh period in seconds
pub const ENV_REFRESH_SECS: &str = "CRYPTO_PREDICTOR_REFRESH_SECS";
/// Notification lifetime in milliseconds
pub const ENV_NOTIFICATION_TTL_MS: &str = "CRYPTO_PREDICTOR_NOTIFICATION_TTL_MS";
/// Directory for persisted preferences
pub const ENV_STORAGE_DIR: &str = "CRYPTO_PREDICTOR_STORAGE_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_url: String,
    pub page_size: u32,
    pub refresh_interval: Duration,
    pub notification_ttl: Duration,
    /// `None` keeps preferences in memory only
    pub storage_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: COINGECKO_API_URL.to_string(),
            page_size: MARKETS_PAGE_SIZE,
            refresh_interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            notification_ttl: Duration::from_millis(NOTIFICATION_TTL_MS),
            storage_dir: None,
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = env_opt(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "Ignoring unparsable environment value");
            None
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by the `CRYPTO_PREDICTOR_*` environment variables
    ///
    /// Empty or unparsable values are ignored, as is a zero refresh period.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(url) = env_opt(ENV_API_URL) {
            cfg.api_url = url;
        }
        if let Some(secs) = env_u64(ENV_REFRESH_SECS).filter(|s| *s > 0) {
            cfg.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(ms) = env_u64(ENV_NOTIFICATION_TTL_MS) {
            cfg.notification_ttl = Duration::from_millis(ms);
        }
        if let Some(dir) = env_opt(ENV_STORAGE_DIR) {
            cfg.storage_dir = Some(PathBuf::from(dir));
        }

        cfg
    }
}
