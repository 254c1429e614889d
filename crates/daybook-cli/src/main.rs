//! Daybook CLI - keep a mood journal from the terminal
//!
//! Entries, photos and sessions live in the hosted backend; the CLI holds
//! only profile configuration and the keychain session.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::calendar::run_calendar;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::export::run_export;
use crate::commands::list::run_list;
use crate::commands::new::run_new;
use crate::commands::open::run_open;
use crate::commands::write::run_write;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                "daybook=info"
                    .parse()
                    .map_err(|error| CliError::Config(format!("{error}")))?,
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Some(Commands::List { limit, json }) => run_list(limit, json, profile).await?,
        Some(Commands::Calendar { month }) => run_calendar(month.as_deref(), profile).await?,
        Some(Commands::Open { date }) => run_open(&date, profile).await?,
        Some(Commands::New {
            date,
            title,
            mood,
            photo,
            content,
        }) => {
            run_new(
                date.as_deref(),
                title,
                mood.as_deref(),
                photo.as_deref(),
                &content,
                profile,
            )
            .await?;
        }
        Some(Commands::Write {
            mood,
            title,
            photo,
            entry_id,
        }) => {
            run_write(
                mood.as_deref(),
                title,
                photo.as_deref(),
                entry_id.as_deref(),
                profile,
            )
            .await?;
        }
        Some(Commands::Export { format, output }) => {
            run_export(format, output.as_deref(), profile).await?;
        }
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        Some(Commands::Config { command }) => run_config(command, profile).await?,
        Some(Commands::Auth { command }) => run_auth(command, profile).await?,
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}
