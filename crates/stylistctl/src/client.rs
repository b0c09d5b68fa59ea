//! HTTP client for communicating with stylistd.

use anyhow::{anyhow, Context, Result};
use std::time::Duration;
use stylist_common::{
    HealthResponse, OutfitResponse, SearchRequest, SearchResponse, TurnRequest, TurnResponse,
    UserId,
};
use tracing::debug;

/// Upper bound for one request; a turn can fan out to several catalog calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the stylistd HTTP API
pub struct StylistClient {
    base_url: String,
    http: reqwest::Client,
}

impl StylistClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn unreachable(&self, e: reqwest::Error) -> anyhow::Error {
        anyhow!(
            "Cannot reach stylistd at {}: {}\n\n\
             Start the daemon with `stylistd`, or point --url / STYLIST_URL at it.",
            self.base_url,
            e
        )
    }

    /// Send one conversation turn
    pub async fn chat(&self, prompt: &str, user_id: &UserId) -> Result<TurnResponse> {
        let request = TurnRequest {
            prompt: prompt.to_string(),
            user_id: user_id.clone(),
        };
        debug!("POST /chat user={}", user_id);

        let response = self
            .http
            .post(self.endpoint("/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        // Failed turns still carry a TurnResponse body
        response
            .json::<TurnResponse>()
            .await
            .context("Invalid turn response from daemon")
    }

    pub async fn search(&self, prompt: &str, limit: Option<usize>) -> Result<SearchResponse> {
        let request = SearchRequest {
            prompt: prompt.to_string(),
            limit,
        };
        let response = self
            .http
            .post(self.endpoint("/v1/search"))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn outfit(&self, user_id: &UserId) -> Result<OutfitResponse> {
        let response = self
            .http
            .get(self.endpoint(&format!("/v1/outfit/{}", user_id)))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(self.endpoint("/v1/health"))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
