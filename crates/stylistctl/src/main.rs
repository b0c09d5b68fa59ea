//! Stylist Control - CLI client for the stylist daemon

use anyhow::Result;
use clap::Parser;
use stylist_common::UserId;
use stylistctl::cli::{Cli, Commands};
use stylistctl::client::StylistClient;
use stylistctl::{output, repl};
use tracing_subscriber::EnvFilter;

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stylistctl=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = StylistClient::new(&cli.url)?;
    let user_id = UserId::from(cli.user_id.as_str());

    let result = match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => repl::run(&client, &user_id).await,
        Commands::Ask { prompt, json } => {
            let response = client.chat(&prompt.join(" "), &user_id).await;
            match response {
                Ok(r) if json => print_json(&r),
                Ok(r) => {
                    println!("{}", output::render_turn(&r));
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Commands::Search {
            prompt,
            limit,
            json,
        } => match client.search(&prompt.join(" "), limit).await {
            Ok(r) if json => print_json(&r),
            Ok(r) => {
                println!("{}", output::render_search(&r));
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Outfit { json } => match client.outfit(&user_id).await {
            Ok(r) if json => print_json(&r),
            Ok(r) => {
                println!("{}", output::render_outfit(&r));
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Status { json } => match client.health().await {
            Ok(h) if json => print_json(&h),
            Ok(h) => {
                println!("{}", output::render_health(&h));
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        output::display_error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
