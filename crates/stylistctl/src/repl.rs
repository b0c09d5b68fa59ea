//! REPL - interactive chat with the daemon

use anyhow::Result;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use stylist_common::UserId;

use crate::client::StylistClient;
use crate::output;

const EXIT_WORDS: &[&str] = &["quit", "exit", "bye"];

pub fn is_exit_command(line: &str) -> bool {
    let word = line.trim().trim_end_matches(['!', '.']).to_lowercase();
    EXIT_WORDS.contains(&word.as_str())
}

fn print_prompt() {
    print!("{} ", "you>".bold());
    let _ = io::stdout().flush();
}

/// Run the chat loop until EOF or an exit word
pub async fn run(client: &StylistClient, user_id: &UserId) -> Result<()> {
    println!(
        "Chatting with {} as user {}. Type {} to leave.",
        client.base_url().cyan(),
        user_id,
        "quit".bold()
    );
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_prompt();

        let input = match lines.next() {
            Some(Ok(line)) => line.trim().to_string(),
            Some(Err(e)) => {
                output::display_error(&format!("Error reading input: {}", e));
                continue;
            }
            None => break, // EOF
        };

        if input.is_empty() {
            continue;
        }
        if is_exit_command(&input) {
            println!("Bye! Your outfit is saved until the daemon restarts.");
            break;
        }

        // A dropped connection should not end the session
        match client.chat(&input, user_id).await {
            Ok(response) => println!("{}", output::render_turn(&response)),
            Err(e) => output::display_error(&e.to_string()),
        }
        println!();
    }

    Ok(())
}
