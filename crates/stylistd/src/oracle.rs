//! Language-understanding oracle.
//!
//! An OpenAI-compatible chat endpoint that turns free text into either a
//! search theme or a clarifying question. It is optional: every failure mode
//! maps to an `OracleError` and the caller falls back to the deterministic path.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stylist_common::Slot;
use thiserror::Error;
use tracing::debug;

use crate::config::OracleConfig;

const SYSTEM_PROMPT: &str = "You help players of an avatar game put together outfits from the \
catalog. Read the player's message and decide one of two things. If it describes a look, a \
theme, a style or specific items, answer with {\"action\":\"search\",\"theme\":\"<short search \
phrase using words like knight, ninja, formal, casual, pirate, plus any price limit>\"}. If it is \
too vague to search, answer with {\"action\":\"clarify\",\"reply\":\"<one short friendly \
question>\"}. Respond with JSON only.";

#[derive(Debug, Clone, Error)]
pub enum OracleError {
    #[error("Oracle is disabled in configuration")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("Oracle returned empty response")]
    EmptyResponse,
}

impl OracleError {
    /// Metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            OracleError::Disabled => "disabled",
            OracleError::Http(_) => "http_error",
            OracleError::Timeout(_) => "timeout",
            OracleError::InvalidJson(_) => "invalid_json",
            OracleError::EmptyResponse => "empty",
        }
    }
}

/// Structured decision returned by the oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OracleDecision {
    Search { theme: String },
    Clarify { reply: String },
}

/// Session hints passed along with the user text
#[derive(Debug, Clone, Default)]
pub struct OracleHints {
    pub filled_slots: Vec<Slot>,
}

#[async_trait]
pub trait Oracle: Send + Sync {
    async fn interpret(&self, text: &str, hints: &OracleHints)
        -> Result<OracleDecision, OracleError>;
}

/// OpenAI-compatible HTTP oracle
pub struct HttpOracle {
    config: OracleConfig,
    client: reqwest::Client,
}

impl HttpOracle {
    pub fn new(config: OracleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;
        Ok(Self { config, client })
    }

    pub fn is_active(&self) -> bool {
        self.config.is_active()
    }

    fn user_prompt(text: &str, hints: &OracleHints) -> String {
        if hints.filled_slots.is_empty() {
            format!("Player message: {}", text)
        } else {
            let slots: Vec<&str> = hints.filled_slots.iter().map(Slot::display_name).collect();
            format!(
                "Player message: {}\nCurrent outfit already has: {}",
                text,
                slots.join(", ")
            )
        }
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn interpret(
        &self,
        text: &str,
        hints: &OracleHints,
    ) -> Result<OracleDecision, OracleError> {
        if !self.is_active() {
            return Err(OracleError::Disabled);
        }

        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": Self::user_prompt(text, hints)},
            ],
            "response_format": {"type": "json_object"},
            "temperature": 0.2,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout(self.config.timeout_secs)
            } else {
                OracleError::Http(format!("Request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(OracleError::Http(format!(
                "HTTP {} from OpenAI-compatible API",
                response.status()
            )));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OracleError::InvalidJson(format!("Failed to parse response: {}", e)))?;

        let content = response_json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or(OracleError::EmptyResponse)?;

        debug!("Oracle raw content: {}", content);
        parse_decision(content)
    }
}

/// Pull the JSON object out of a model reply (bare, fenced, or embedded)
fn extract_json(response: &str) -> Option<&str> {
    let t = response.trim();
    if t.starts_with('{') && t.ends_with('}') {
        return Some(t);
    }
    let start = t.find('{')?;
    let end = t.rfind('}')?;
    (start < end).then(|| &t[start..=end])
}

/// Parse and validate an oracle reply
pub fn parse_decision(content: &str) -> Result<OracleDecision, OracleError> {
    if content.trim().is_empty() {
        return Err(OracleError::EmptyResponse);
    }
    let json = extract_json(content)
        .ok_or_else(|| OracleError::InvalidJson("No JSON object found".to_string()))?;
    let decision: OracleDecision =
        serde_json::from_str(json).map_err(|e| OracleError::InvalidJson(e.to_string()))?;

    match &decision {
        OracleDecision::Search { theme } if theme.trim().is_empty() => Err(OracleError::EmptyResponse),
        OracleDecision::Clarify { reply } if reply.trim().is_empty() => Err(OracleError::EmptyResponse),
        _ => Ok(decision),
    }
}
