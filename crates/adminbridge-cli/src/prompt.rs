//! Terminal implementations of the re-authentication collaborators.

use std::io::{self, BufRead, Write};

use adminbridge_core::{Navigator, PromptOutcome, ReauthPrompt};
use async_trait::async_trait;
use colored::Colorize;
use tracing::warn;

/// Asks on stderr, answers from stdin. Anything but `y`/`yes` cancels.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

#[async_trait]
impl ReauthPrompt for TerminalPrompt {
    async fn confirm(&self, message: &str) -> PromptOutcome {
        let message = message.to_string();
        let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
            eprint!("{} {} [y/N] ", "?".yellow().bold(), message);
            io::stderr().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => parse_answer(&line),
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to read prompt answer");
                PromptOutcome::Cancelled
            }
            Err(e) => {
                warn!(error = %e, "Prompt task failed");
                PromptOutcome::Cancelled
            }
        }
    }
}

fn parse_answer(line: &str) -> PromptOutcome {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => PromptOutcome::Confirmed,
        _ => PromptOutcome::Cancelled,
    }
}

/// There is no page to move to; tell the user how to sign in again.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, target: &str) {
        eprintln!(
            "{} Session cleared ({}). Sign in again with:\n  {} adminbridge login -u <username>",
            "!".yellow().bold(),
            target,
            "$".dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("y\n"), PromptOutcome::Confirmed);
        assert_eq!(parse_answer(" YES "), PromptOutcome::Confirmed);
        assert_eq!(parse_answer("\n"), PromptOutcome::Cancelled);
        assert_eq!(parse_answer("no"), PromptOutcome::Cancelled);
    }
}
