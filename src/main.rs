use std::path::Path;

use chat::Chat;
use clap::Parser;
use cli::commands::Cli;
use client::OpenAiClient;
use config::Config;
use tools::git::Git;
use tracing::{debug, error, info};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::handlers::CommitHandler;

mod chat;
mod cli;
mod client;
mod config;
mod tools;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    debug!(?cli, "Arguments parsed");

    // Configuration must be complete before git or the API are touched
    let config = match Config::load(&cli.sources()) {
        Ok(config) => config,
        Err(e) => {
            error!(%e, "Invalid configuration");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Dependencies
    let client = OpenAiClient::new(&config)?;
    let chat = Chat::new(client, config.model.clone());
    let git = Git::new(cli.directory.clone());

    let handler = CommitHandler::new(&config, chat, git, cli.confirm);
    let outcome = handler
        .run(&mut std::io::stdout(), &mut std::io::stdin().lock())
        .await?;

    info!(?outcome, "Finished");
    let exit_code = outcome.exit_code();
    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

static LOG_FILE: &str = "/tmp/ai-commit.log";

/// Log to [`LOG_FILE`]; logging is off when the file can't be created
fn init_logging() {
    let file_layer = open_log_file(Path::new(LOG_FILE))
        .map(|file| tracing_subscriber::fmt::layer().with_writer(file));
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "ai_commit=info".into()),
        ))
        .with(file_layer)
        .init();
}

fn open_log_file(path: &Path) -> Option<std::fs::File> {
    std::fs::File::create(path).ok()
}
