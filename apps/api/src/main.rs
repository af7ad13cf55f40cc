mod cli;
mod config;
mod cost;
mod errors;
mod layout;
mod letter;
mod llm_client;
mod render;
mod routes;
mod state;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    let level = cli.log_level(&config.rust_log);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting coverletter v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Generate(args) => cli::generate::handle_generate(args, config).await,
        Commands::Serve(args) => cli::serve::handle_serve(args, config).await,
        Commands::Cost => cli::generate::handle_cost(config).await,
    }
}
