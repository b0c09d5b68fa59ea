//! Command-line argument parsing

use crate::DEFAULT_URL;
use clap::{Parser, Subcommand};

/// Stylist CLI
#[derive(Parser, Debug)]
#[command(name = "stylistctl")]
#[command(about = "Stylist - outfit assistant for Roblox avatars", long_about = None)]
#[command(version = stylist_common::VERSION)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Daemon base URL
    #[arg(long, global = true, env = "STYLIST_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// User the conversation belongs to (number or name)
    #[arg(long, global = true, default_value = "1")]
    pub user_id: String,

    /// Subcommand (if not provided, starts the chat REPL)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Interactive chat session
    Chat,

    /// Send a single prompt and print the reply
    Ask {
        /// What you want, e.g. "knight outfit under 500"
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Ranked catalog items for a prompt, without changing the outfit
    Search {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Maximum number of items (capped at 10 by the daemon)
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Show the current outfit
    Outfit {
        #[arg(long)]
        json: bool,
    },

    /// Show daemon health
    Status {
        #[arg(long)]
        json: bool,
    },
}
