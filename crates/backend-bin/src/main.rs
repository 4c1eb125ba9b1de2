//! `riskreg` command line front end.
//!
//! Each invocation behaves like a page load of the risk-register editor: it
//! rebuilds the login core over the flat-file ledger and runs one call.
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use riskreg_backend_lib::{auth::AuthService, config::DEFAULT_CONFIG_PATH, AppState};
use riskreg_common::LoginFailure;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "riskreg", about = "Risk register login session tool")]
struct Cli {
    /// Settings file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with the configured credential pair
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Report whether a session is active (clears it if expired)
    Status,
    /// End the current session
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let state = AppState::load_from(&cli.config)?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&state.settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Login { username, password } => match state.auth.login(&username, &password).await {
            Ok(reply) => {
                println!("{}", serde_json::to_string_pretty(&reply)?);
                eprintln!("Welcome, {}! Session valid until {}", reply.user, format_millis(reply.expires_at));
                Ok(ExitCode::SUCCESS)
            },
            Err(e) => {
                tracing::debug!(code = e.error_code(), "login rejected");
                println!("{}", serde_json::to_string_pretty(&LoginFailure::from(e))?);
                Ok(ExitCode::FAILURE)
            },
        },
        Command::Status => match state.auth.current_session() {
            Some(session) => {
                println!("authenticated as {} until {}", session.user, format_millis(session.expires_at));
                Ok(ExitCode::SUCCESS)
            },
            None => {
                println!("not authenticated");
                Ok(ExitCode::FAILURE)
            },
        },
        Command::Logout => {
            println!("{}", serde_json::to_string(&state.auth.logout())?);
            Ok(ExitCode::SUCCESS)
        },
    }
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}
