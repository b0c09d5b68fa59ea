//! Configuration management for stylistd.
//!
//! Loads settings from $STYLIST_CONFIG, then /etc/stylist/config.toml, then
//! falls back to defaults. Environment overrides are applied last.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

use crate::catalog::BackoffConfig;

/// Config file path
pub const CONFIG_PATH: &str = "/etc/stylist/config.toml";

/// Env var naming an alternate config file
pub const CONFIG_ENV: &str = "STYLIST_CONFIG";

pub const DEFAULT_CATALOG_URL: &str = "https://catalog.roblox.com/v1/search/items/details";
pub const DEFAULT_ORACLE_ENDPOINT: &str = "https://api.openai.com";

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Request body cap in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind() -> String {
    stylist_common::DEFAULT_BIND.to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Catalog lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per lookup, first try included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,

    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    200
}

fn default_backoff_max_ms() -> u64 {
    2_000
}

fn default_backoff_factor() -> f64 {
    2.0
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl CatalogConfig {
    pub fn backoff(&self) -> BackoffConfig {
        BackoffConfig {
            base_ms: self.backoff_base_ms,
            factor: self.backoff_factor,
            max_ms: self.backoff_max_ms,
            max_attempts: self.max_attempts.max(1) as usize,
            ..BackoffConfig::default()
        }
    }
}

/// Language-understanding oracle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Unset means "on when an API key is present"; `false` always wins
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default = "default_oracle_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_oracle_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_oracle_endpoint() -> String {
    DEFAULT_ORACLE_ENDPOINT.to_string()
}

fn default_oracle_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            endpoint: default_oracle_endpoint(),
            model: default_oracle_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OracleConfig {
    /// Usable when a key is configured and not switched off
    pub fn is_active(&self) -> bool {
        self.enabled != Some(false)
            && self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub oracle: OracleConfig,
}

impl Config {
    /// Load config from file or defaults, then apply environment overrides
    pub fn load() -> Self {
        let explicit = std::env::var(CONFIG_ENV).ok();
        let mut config = explicit
            .as_deref()
            .map(Self::load_from_path)
            .unwrap_or_else(|| Self::load_from_path(CONFIG_PATH))
            .unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            });
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load config from specific path
    pub fn load_from_path(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path);
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Unparseable numbers are
    /// ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("STYLIST_BIND") {
            self.server.bind = bind;
        }
        if let Some(url) = lookup("CATALOG_URL") {
            self.catalog.url = url;
        }
        if let Some(raw) = lookup("REQUEST_TIMEOUT") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    self.catalog.timeout_secs = secs;
                    self.oracle.timeout_secs = secs;
                }
                _ => warn!("Ignoring REQUEST_TIMEOUT={:?}", raw),
            }
        }
        if let Some(raw) = lookup("RETRIES") {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => self.catalog.max_attempts = n,
                _ => warn!("Ignoring RETRIES={:?}", raw),
            }
        }
        if let Some(model) = lookup("MODEL_NAME") {
            self.oracle.model = model;
        }
        if let Some(endpoint) = lookup("ORACLE_ENDPOINT") {
            self.oracle.endpoint = endpoint;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.oracle.api_key = Some(key);
            }
        }
    }
}
