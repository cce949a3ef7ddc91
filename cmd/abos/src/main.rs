//! # ABOS Binary
//!
//! The entry point that assembles settings, logging and the store, then runs
//! a single command.

mod bootstrap;
mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use configs::Settings;
use domains::{DomainError, Session};

use crate::cli::{Cli, Command};

fn session_for(cli: &Cli) -> Session {
    match &cli.user {
        Some(user) => {
            let email = cli
                .email
                .clone()
                .unwrap_or_else(|| format!("{user}@abos.ge"));
            Session::new(user.as_str(), email, cli.role)
        }
        None => Session::demo(),
    }
}

async fn execute(settings: &Settings, session: &Session, command: Command) -> anyhow::Result<()> {
    let store = bootstrap::open_store(settings).await?;
    commands::run(store, session, command).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load_from(&cli.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    bootstrap::init_tracing(&settings);

    let session = session_for(&cli);
    match execute(&settings, &session, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<DomainError>() {
                Some(domain) => {
                    tracing::debug!(error = %e, "command failed");
                    eprintln!("{}", domain.user_message());
                }
                None => eprintln!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
