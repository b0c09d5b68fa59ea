//! Wire types for the stylistd HTTP API.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mapper::CatalogItem;
use crate::params::FilterParams;

/// User identifier. Accepts a number or a string and echoes it back
/// in the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl UserId {
    /// Session key: numeric strings collapse to `Number`
    pub fn normalized(&self) -> UserId {
        match self {
            UserId::Text(s) => UserId::from(s.as_str()),
            other => other.clone(),
        }
    }
}

impl Default for UserId {
    fn default() -> Self {
        UserId::Number(0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{}", n),
            UserId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for UserId {
    fn from(n: u64) -> Self {
        UserId::Number(n)
    }
}

impl From<&str> for UserId {
    /// Numeric strings normalize to `Number` so "7" and 7 share a session
    fn from(s: &str) -> Self {
        match s.trim().parse::<u64>() {
            Ok(n) => UserId::Number(n),
            Err(_) => UserId::Text(s.trim().to_string()),
        }
    }
}

/// What a turn did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    Greet,
    NewOutfit,
    Replace,
    ShowMore,
    Clarify,
    Error,
}

impl TurnAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnAction::Greet => "greet",
            TurnAction::NewOutfit => "new_outfit",
            TurnAction::Replace => "replace",
            TurnAction::ShowMore => "show_more",
            TurnAction::Clarify => "clarify",
            TurnAction::Error => "error",
        }
    }
}

impl fmt::Display for TurnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// POST /chat body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    pub prompt: String,
    #[serde(rename = "userId", alias = "user_id", default)]
    pub user_id: UserId,
}

/// POST /chat response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub success: bool,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub action: TurnAction,
    pub reply: String,
    pub outfit: Vec<CatalogItem>,
}

impl TurnResponse {
    /// Boundary reply for any internal failure: no outfit, apology only
    pub fn failure(user_id: UserId, reply: impl Into<String>) -> Self {
        Self {
            success: false,
            user_id,
            action: TurnAction::Error,
            reply: reply.into(),
            outfit: Vec::new(),
        }
    }
}

/// POST /v1/search body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// POST /v1/search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub params: FilterParams,
    pub items: Vec<CatalogItem>,
}

/// GET /v1/outfit/:user_id response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitResponse {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub outfit: Vec<CatalogItem>,
}

/// GET /v1/health response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub sessions: usize,
    pub oracle_enabled: bool,
}
