//! Stylist Control - terminal client for the stylist daemon

pub mod cli;
pub mod client;
pub mod output;
pub mod repl;

/// Daemon address used when neither `--url` nor `STYLIST_URL` is set
pub const DEFAULT_URL: &str = "http://127.0.0.1:7865";
