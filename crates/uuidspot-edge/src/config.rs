//! Configuration types and loading logic.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

/// Top-level edge configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server listen configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

/// Analytics upstream configuration for the `/gtf` relay.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Upstream origin requests under `/gtf` are relayed to.
    #[serde(default = "default_upstream")]
    pub upstream: String,

    /// Client-level timeout for the single relay attempt.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "uuidspot_edge=debug,info").
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_address() -> String {
    "0.0.0.0:3080".to_string()
}

fn default_upstream() -> String {
    "https://eu.i.posthog.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            upstream: default_upstream(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl EdgeConfig {
    /// Load configuration from TOML file and environment variables.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (UUIDSPOT_ prefix, __ for nesting)
    /// 2. TOML config file
    /// 3. Defaults
    ///
    /// A missing config file is not an error; defaults apply.
    pub fn load(config_path: &str) -> anyhow::Result<Self> {
        let config: EdgeConfig = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("UUIDSPOT_").split("__"))
            .extract()?;

        Ok(config)
    }
}
