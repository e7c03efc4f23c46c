//! Foundry service entry point.

use anyhow::Context;
use clap::{Parser, Subcommand};
use foundry_rs::config::{FoundryConfig, LayeredConfigOptions};
use foundry_rs::memory::api_key_from_env;
use foundry_rs::server;
use log::{debug, info};
use std::path::PathBuf;

/// Command-line options for the Foundry service.
#[derive(Parser)]
#[command(name = "foundry", version)]
struct Cli {
    /// Extra foundry.json5 layer applied on top of discovered layers
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the advisor chat routes until Ctrl-C
    Serve {
        /// Address to bind, overriding server.bind
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the effective configuration as JSON
    ShowConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    foundry_rs::init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Serve { bind } => {
            let api_key = api_key_from_env(&config.openai.api_key_env)?;
            let state = foundry_rs::build_state(&config, &api_key)?;
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let handle = server::start(state, &bind)
                .await
                .with_context(|| format!("failed to bind {bind}"))?;

            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for Ctrl-C")?;
            info!("shutting down (port={})", handle.port);
            handle.shutdown().await?;
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<FoundryConfig> {
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = path {
        options = options.with_runtime_path(path);
    }
    let layered =
        FoundryConfig::load_layered_with_options(options).context("failed to load config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}
