mod cli;
mod commands;
mod render;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use client::{AppConfig, HttpAnswerService};
use form::QueryForm;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn init_tracing(json: bool) {
    // Logs go to stderr so they never mix with answers on stdout.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    // Flags can still repair a bad file or env value, so validate last.
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let service = HttpAnswerService::from_config(&config.api)?;
    info!(api = %service.base_url(), "Using answer service");

    match cli.command {
        None | Some(Command::Chat { .. }) => {
            let form = QueryForm::new(service, &config.form);
            let stdin = BufReader::new(tokio::io::stdin());
            session::run(&form, stdin, &mut std::io::stdout()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Ask { question, json, .. }) => {
            let form = QueryForm::new(service, &config.form);
            commands::ask(&form, question, json, &mut std::io::stdout()).await
        }
        Some(Command::Health) => {
            commands::health(&service, &mut std::io::stdout(), &mut std::io::stderr()).await
        }
        Some(Command::Neighbors { entity_id, k }) => {
            commands::neighbors(
                &service,
                &entity_id,
                k,
                &mut std::io::stdout(),
                &mut std::io::stderr(),
            )
            .await
        }
    }
}
