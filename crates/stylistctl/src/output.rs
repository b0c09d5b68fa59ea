//! Output formatting - plain ASCII with color accents

use owo_colors::OwoColorize;
use stylist_common::{
    CatalogItem, HealthResponse, OutfitResponse, SearchResponse, TurnAction, TurnResponse,
};

pub const THIN_SEPARATOR: &str = "------------------------------------------------------------";

/// One line per outfit entry: `  Head            12345`
pub fn render_items(items: &[CatalogItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "  {:<20} {}",
                item.slot.display_name().cyan().to_string(),
                item.asset_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn action_tag(action: TurnAction) -> String {
    let tag = format!("[{}]", action.as_str().to_uppercase());
    match action {
        TurnAction::NewOutfit | TurnAction::Replace | TurnAction::ShowMore => {
            tag.bright_green().to_string()
        }
        TurnAction::Greet | TurnAction::Clarify => tag.yellow().to_string(),
        TurnAction::Error => tag.bright_red().to_string(),
    }
}

pub fn render_turn(response: &TurnResponse) -> String {
    let mut out = String::new();
    let reply = if response.success {
        response.reply.clone()
    } else {
        response.reply.bright_red().to_string()
    };
    out.push_str(&format!("{} {}", action_tag(response.action), reply));

    // Only mutations change the outfit; no need to reprint it otherwise
    let changed = matches!(
        response.action,
        TurnAction::NewOutfit | TurnAction::Replace | TurnAction::ShowMore
    );
    if changed && !response.outfit.is_empty() {
        out.push('\n');
        out.push_str(&render_items(&response.outfit));
    }
    out
}

pub fn render_outfit(response: &OutfitResponse) -> String {
    if response.outfit.is_empty() {
        return format!("No outfit yet for user {}.", response.user_id)
            .dimmed()
            .to_string();
    }
    format!(
        "Outfit for user {}\n{}\n{}",
        response.user_id,
        THIN_SEPARATOR.dimmed(),
        render_items(&response.outfit)
    )
}

pub fn render_search(response: &SearchResponse) -> String {
    if response.items.is_empty() {
        return "No matching items.".yellow().to_string();
    }
    render_items(&response.items)
}

pub fn render_health(health: &HealthResponse) -> String {
    let status = if health.status == "ok" {
        "[OK]".bright_green().to_string()
    } else {
        format!("[{}]", health.status.to_uppercase()).bright_red().to_string()
    };
    let oracle = if health.oracle_enabled {
        "enabled".green().to_string()
    } else {
        "disabled".dimmed().to_string()
    };
    format!(
        "{}  stylistd v{}\n  Uptime:   {}s\n  Sessions: {}\n  Oracle:   {}",
        status, health.version, health.uptime_seconds, health.sessions, oracle
    )
}

/// Display an error
pub fn display_error(message: &str) {
    eprintln!();
    eprintln!("[ERROR] {}", message.red());
    eprintln!();
}
