//! Shared types and deterministic logic for the stylist components.
//!
//! Everything here is synchronous and free of I/O: slot tables, filter
//! heuristics, item mapping, planning, the per-user outfit state machine and
//! the wire types spoken by stylistd.

pub mod error;
pub mod heuristics;
pub mod intent;
pub mod mapper;
pub mod params;
pub mod planner;
pub mod ranker;
pub mod reply;
pub mod rpc;
pub mod session;
pub mod slot;
pub mod text;

pub use error::StylistError;
pub use heuristics::{detect_filters, extract_keyword, parse_price};
pub use intent::{classify, ClarifyReason, TurnIntent};
pub use mapper::{map_items, CatalogItem, RawCatalogItem};
pub use params::{CatalogQuery, FilterParams, LOOKUP_LIMIT};
pub use planner::{plan_steps, PlanStep, MAX_PLAN_STEPS};
pub use ranker::diversify;
pub use rpc::{
    HealthResponse, OutfitResponse, SearchRequest, SearchResponse, TurnAction, TurnRequest,
    TurnResponse, UserId,
};
pub use session::{ApplyReport, OutfitSession, SlotPhase, SlotSelection, StepOutcome};
pub use slot::Slot;

/// Crate version, reported by the health endpoint
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default daemon address
pub const DEFAULT_BIND: &str = "127.0.0.1:7865";
