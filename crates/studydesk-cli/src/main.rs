//! StudyDesk CLI
//!
//! Ask questions about your course material from the terminal.

use anyhow::Result;
use clap::Parser;
use studydesk_core::error::exit_codes;
use studydesk_core::{Config, StudyDeskError, Subject};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file, applying the `--subject` override
fn load_config(subject: Option<Subject>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(subject) = subject {
        config.subject = subject;
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli.format;
    let verbose = cli.verbose;
    let subject = cli.subject;

    match cli.command {
        Commands::Ask(args) => {
            commands::ask::run(args, &load_config(subject)?, format, verbose).await
        }
        Commands::Chat(args) => commands::chat::run(args, &load_config(subject)?).await,
        Commands::Study(args) => {
            commands::study::run(args, &load_config(subject)?, format, verbose).await
        }
        Commands::Extract(args) => {
            commands::extract::run(args, &load_config(subject)?, format).await
        }
        Commands::Export(args) => commands::export::run(args, &load_config(subject)?).await,
        Commands::Models => commands::models::run(&load_config(subject)?, format).await,
        Commands::Status => commands::status::run(&load_config(subject)?, format).await,
        // Does not read the file, so a broken config can still be replaced
        Commands::Config(args) => commands::config::run(args).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<StudyDeskError>()
            .map(StudyDeskError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}
