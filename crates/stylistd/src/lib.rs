//! Stylist daemon library - exposes modules for testing.

pub mod catalog;
pub mod config;
pub mod metrics;
pub mod oracle;
pub mod orchestrator;
pub mod routes;
pub mod server;
pub mod sessions;
