// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach-Sync command line client
//!
//! Drives the session and schedule synchronization core against the
//! coaching backend and prints results as JSON.

use clap::{Parser, Subcommand};
use coach_sync::{config::Config, models::Session, CoachClient};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "coach-sync", about = "Coaching session and schedule sync client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with email and password
    Login {
        email: String,
        #[arg(long, env = "COACH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Signup {
        email: String,
        name: String,
        #[arg(long, env = "COACH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Restore the stored session (validate, then refresh)
    Restore,
    /// Print the training schedules
    Schedules {
        /// Only sessions after this unix timestamp
        #[arg(long)]
        since: Option<i64>,
    },
    /// Regenerate schedules from the linked provider and reload
    Regenerate {
        #[arg(long)]
        since: Option<i64>,
    },
    /// Print laps and streams of one session
    Detail { session_id: String },
    /// Log out and forget the local session
    Logout,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing::info!(
        api = %config.api_base_url,
        store = %config.store_path.display(),
        "Starting coach-sync"
    );

    let client = CoachClient::from_config(&config)?;

    match cli.command {
        Command::Login { email, password } => {
            let session = client.auth.login(&email, &password).await?;
            print_json(&SessionView::from(&session))?;
        }
        Command::Signup {
            email,
            name,
            password,
        } => {
            let created = client.auth.signup(&email, &password, &name).await?;
            print_json(&serde_json::json!({ "created": created }))?;
        }
        Command::Restore => {
            let session = client.auth.login_with_token().await?;
            print_json(&SessionView::from(&session))?;
        }
        Command::Schedules { since } => {
            let records = match since {
                Some(since) => client.schedules.load_since(since).await?,
                None => client.schedules.load().await?,
            };
            print_json(&records)?;
        }
        Command::Regenerate { since } => {
            let records = match since {
                Some(since) => client.schedules.regenerate_since(since).await?,
                None => client.schedules.regenerate_and_reload().await?,
            };
            print_json(&records)?;
        }
        Command::Detail { session_id } => {
            let detail = client.schedules.detail(&session_id).await?;
            print_json(&detail)?;
        }
        Command::Logout => {
            client.auth.logout().await?;
            print_json(&serde_json::json!({ "logged_out": true }))?;
        }
    }

    Ok(())
}

/// Session summary printed to stdout (no secrets).
#[derive(Serialize)]
struct SessionView<'a> {
    account: &'a coach_sync::models::Account,
    connected: &'a [String],
    new_credential: bool,
}

impl<'a> From<&'a Session> for SessionView<'a> {
    fn from(session: &'a Session) -> Self {
        Self {
            account: &session.account,
            connected: &session.connected,
            new_credential: session.credential.is_some(),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("coach_sync=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
