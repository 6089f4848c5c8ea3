use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "adminbridge")]
#[command(version, about = "AdminBridge - session-aware client for the admin API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides the config file)
    #[arg(long, global = true, env = "ADMINBRIDGE_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, env = "ADMINBRIDGE_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Session database path (defaults to the data directory)
    #[arg(long, global = true, env = "ADMINBRIDGE_SESSION_PATH")]
    pub session_path: Option<String>,

    /// Keep the session in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and cache the profile and route table
    Login(LoginArgs),

    /// Sign out and clear the local session
    Logout,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// Show session state
    Status,

    /// Show the current user profile
    Whoami,

    /// Show the reference dictionary
    Dict {
        /// Only the entry with this dictionary type
        #[arg(long)]
        dict_type: Option<String>,
    },

    /// Show the route table
    Routes {
        /// Print every entry on its own line
        #[arg(long)]
        flat: bool,
    },

    /// Call an endpoint and print the normalized response
    Call(CallArgs),

    /// Show the effective configuration
    Config,
}

#[derive(Args)]
pub struct LoginArgs {
    /// Username
    #[arg(short, long, env = "ADMINBRIDGE_USERNAME")]
    pub username: String,

    /// Password (prompted when omitted)
    #[arg(short, long, env = "ADMINBRIDGE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Captcha answer
    #[arg(long, requires = "captcha_key")]
    pub captcha: Option<String>,

    /// Captcha key issued with the challenge
    #[arg(long)]
    pub captcha_key: Option<String>,
}

#[derive(Args)]
pub struct CallArgs {
    /// Path relative to the base URL
    pub path: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Query parameters as a JSON object
    #[arg(long)]
    pub params: Option<String>,

    /// Request body as JSON
    #[arg(long)]
    pub data: Option<String>,

    /// Extra header, `name: value` (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Write the raw response body to this file instead of normalizing it
    #[arg(short, long)]
    pub output: Option<String>,
}
