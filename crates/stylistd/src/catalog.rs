//! Catalog lookup over HTTP with bounded retry.
//!
//! Each lookup gets a per-call timeout and a small number of attempts with
//! jittered exponential backoff. Callers treat an exhausted lookup as an
//! empty pool.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use stylist_common::{CatalogQuery, RawCatalogItem};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::metrics::StylistMetrics;

/// Exponential backoff configuration
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    pub base_ms: u64,
    pub factor: f64,
    pub jitter_percent: f64,
    pub max_ms: u64,
    pub max_attempts: usize,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_ms: 200,
            factor: 2.0,
            jitter_percent: 0.20,
            max_ms: 2_000,
            max_attempts: 3,
        }
    }
}

impl BackoffConfig {
    /// Backoff before retry number `attempt` (0-based), with ±jitter
    pub fn calculate_backoff(&self, attempt: usize) -> Duration {
        use rand::Rng;

        let base_backoff =
            (self.base_ms as f64 * self.factor.powi(attempt as i32)).min(self.max_ms as f64);

        let mut rng = rand::thread_rng();
        let jitter_range = base_backoff * self.jitter_percent;
        let jitter = rng.gen_range(-jitter_range..=jitter_range);

        let backoff_ms = (base_backoff + jitter).max(0.0) as u64;
        Duration::from_millis(backoff_ms)
    }
}

/// Lookup attempt classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Success,
    NetworkError,
    RateLimited,
    Http4xx,
    Http5xx,
    Timeout,
    DecodeError,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::Http4xx => "http_4xx",
            Self::Http5xx => "http_5xx",
            Self::Timeout => "timeout",
            Self::DecodeError => "decode_error",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimited | Self::Http5xx | Self::Timeout
        )
    }

    pub fn from_http(status: u16) -> Self {
        match status {
            200..=299 => Self::Success,
            429 => Self::RateLimited,
            400..=499 => Self::Http4xx,
            _ => Self::Http5xx,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Catalog returned HTTP {0}")]
    Http(u16),

    #[error("Invalid catalog response: {0}")]
    Decode(String),

    #[error("Catalog lookup failed after {attempts} attempts: {last}")]
    Exhausted { attempts: usize, last: Box<CatalogError> },
}

impl CatalogError {
    pub fn status(&self) -> RequestStatus {
        match self {
            CatalogError::Timeout => RequestStatus::Timeout,
            CatalogError::Network(_) => RequestStatus::NetworkError,
            CatalogError::Http(code) => RequestStatus::from_http(*code),
            CatalogError::Decode(_) => RequestStatus::DecodeError,
            CatalogError::Exhausted { last, .. } => last.status(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, CatalogError::Exhausted { .. }) && self.status().is_retryable()
    }
}

/// Catalog search capability
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Raw records for one query. Errors are final: retries already happened.
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<RawCatalogItem>, CatalogError>;
}

/// Catalog response envelope
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    data: Vec<RawCatalogItem>,
}

/// HTTP client for the catalog search API
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    url: String,
    backoff: BackoffConfig,
    metrics: Option<Arc<StylistMetrics>>,
}

impl HttpCatalogClient {
    pub fn new(config: &CatalogConfig, metrics: Option<Arc<StylistMetrics>>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("stylistd/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            backoff: config.backoff(),
            metrics,
        })
    }

    fn classify_error(err: &reqwest::Error) -> CatalogError {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if let Some(status) = err.status() {
            CatalogError::Http(status.as_u16())
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Network(err.to_string())
        }
    }

    fn record(&self, status: RequestStatus) {
        if let Some(ref metrics) = self.metrics {
            metrics.record_catalog_request(status.as_str());
        }
    }

    async fn fetch_once(&self, query: &CatalogQuery) -> Result<Vec<RawCatalogItem>, CatalogError> {
        let response = self
            .client
            .get(&self.url)
            .query(&query.to_pairs())
            .send()
            .await
            .map_err(|e| Self::classify_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http(status.as_u16()));
        }

        let body: CatalogResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;
        Ok(body.data)
    }
}

#[async_trait]
impl CatalogLookup for HttpCatalogClient {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<RawCatalogItem>, CatalogError> {
        let attempts = self.backoff.max_attempts.max(1);
        let mut last = CatalogError::Network("no attempt made".to_string());

        for attempt in 0..attempts {
            debug!(
                "Catalog lookup subcategory={:?} (attempt {}/{})",
                query.subcategory,
                attempt + 1,
                attempts
            );

            match self.fetch_once(query).await {
                Ok(items) => {
                    self.record(RequestStatus::Success);
                    return Ok(items);
                }
                Err(e) => {
                    self.record(e.status());
                    if !e.is_retryable() {
                        warn!("Catalog lookup failed, not retrying: {}", e);
                        return Err(e);
                    }
                    warn!("Catalog lookup failed: {}, retrying...", e);
                    last = e;
                }
            }

            if attempt < attempts - 1 {
                let backoff = self.backoff.calculate_backoff(attempt);
                debug!("Backing off for {:?} before retry", backoff);
                if let Some(ref metrics) = self.metrics {
                    metrics.record_backoff_duration(backoff.as_secs_f64());
                }
                sleep(backoff).await;
            }
        }

        Err(CatalogError::Exhausted {
            attempts,
            last: Box::new(last),
        })
    }
}
