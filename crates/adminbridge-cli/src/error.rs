use adminbridge_core::{ClientError, ErrorKind, NetworkErrorKind};
use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(client_err) = err.downcast_ref::<ClientError>() {
        suggest_for(client_err);
    } else {
        let msg = err.to_string().to_lowercase();
        if msg.contains("session database") {
            eprintln!("\n{}", "Suggestion:".yellow().bold());
            eprintln!("  Another adminbridge process may hold the session. Retry with:");
            eprintln!("  {} adminbridge --ephemeral <command>", "$".dimmed());
        }
    }

    std::process::exit(1);
}

fn suggest_for(err: &ClientError) {
    match err.kind() {
        ErrorKind::SessionExpired => {
            eprintln!("\n{}", "Suggestion:".yellow().bold());
            eprintln!("  Sign in again with:");
            eprintln!("  {} adminbridge login -u <username>", "$".dimmed());
        }
        ErrorKind::NetworkError(NetworkErrorKind::Timeout) => {
            eprintln!("\n{}", "Suggestion:".yellow().bold());
            eprintln!("  The server did not answer in time. Raise the timeout with:");
            eprintln!("  {} adminbridge --timeout-ms 120000 <command>", "$".dimmed());
        }
        ErrorKind::NetworkError(NetworkErrorKind::ConnectionError) => {
            eprintln!("\n{}", "Suggestion:".yellow().bold());
            eprintln!("  Check that the server is running and the base URL is right:");
            eprintln!("  {} adminbridge config", "$".dimmed());
        }
        ErrorKind::BusinessError | ErrorKind::Unclassified => {
            if let Some(code) = err.code() {
                eprintln!("  {} {}", "Code:".dimmed(), code);
            }
        }
    }
}
