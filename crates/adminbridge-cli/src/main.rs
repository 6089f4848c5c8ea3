mod cli;
mod commands;
mod config;
mod error;
mod output;
mod prompt;
mod setup;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use setup::prepare_bridge;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error::handle_error(err);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = config::CliConfig::load();
    config.apply_overrides(&cli);

    // Logging goes to a file so it never interleaves with command output
    let log_dir = config::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("logs");
    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "adminbridge.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    let format = cli.format;
    if let Commands::Config = cli.command {
        return commands::config::show(&config, format);
    }

    let bridge = prepare_bridge(&config)?;

    let result = match cli.command {
        Commands::Login(args) => commands::auth::login(&bridge, args, format).await,
        Commands::Logout => commands::auth::logout(&bridge).await,
        Commands::Refresh => commands::auth::refresh(&bridge).await,
        Commands::Status => commands::auth::status(&bridge, format),
        Commands::Whoami => commands::auth::whoami(&bridge, format).await,
        Commands::Dict { dict_type } => commands::dict::run(&bridge, dict_type, format).await,
        Commands::Routes { flat } => commands::routes::run(&bridge, flat, format).await,
        Commands::Call(args) => commands::call::run(&bridge, args, format).await,
        Commands::Config => Ok(()),
    };

    // An expired session may have raised the prompt; let it finish before exiting.
    bridge.guard.wait_idle().await;
    result
}
