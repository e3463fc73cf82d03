//! Runtime configuration
//!
//! Defaults target the public iNaturalist v1 API; every field can be
//! overridden from the environment (the binary also loads `.env`).

use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.inaturalist.org/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RATE_LIMIT_MS: u64 = 1000; // iNaturalist asks for ~1 req/sec

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyConfig {
    /// API root, without trailing slash
    pub api_base: String,
    pub timeout: Duration,
    /// Minimum gap between two API requests
    pub rate_limit: Duration,
    pub user_agent: String,
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rate_limit: Duration::from_millis(DEFAULT_RATE_LIMIT_MS),
            user_agent: format!("inat-nearby/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl NearbyConfig {
    /// Defaults overridden by INAT_API_BASE, INAT_TIMEOUT_SECS,
    /// INAT_RATE_LIMIT_MS and INAT_USER_AGENT
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base) = var("INAT_API_BASE") {
            config = config.with_api_base(base);
        }
        if let Some(secs) = var("INAT_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("INAT_TIMEOUT_SECS is not a number: {}", secs))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = var("INAT_RATE_LIMIT_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("INAT_RATE_LIMIT_MS is not a number: {}", ms))?;
            config.rate_limit = Duration::from_millis(ms);
        }
        if let Some(agent) = var("INAT_USER_AGENT") {
            config.user_agent = agent;
        }

        Ok(config)
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: Duration) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}
