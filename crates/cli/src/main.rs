//! unifile CLI entry point.

mod app;
mod commands;
mod interactive;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use unifile_core::{load_config, load_default_config, validate_config, Config};

use app::App;
use commands::Cli;

/// Config file picked up from the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "unifile.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = load(cli.config.as_deref())?;
    validate_config(&config).context("Configuration validation failed")?;

    init_logging(&config, cli.verbose);
    debug!("Configuration: {:?}", config);

    let app = App::new(config);
    match &cli.command {
        Some(command) => command.execute(&app, cli.format).await,
        None => interactive::run(&app).await,
    }
}

fn load(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path));
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        load_config(&local).with_context(|| format!("Failed to load config from {:?}", local))
    } else {
        load_default_config().context("Failed to load default configuration")
    }
}

/// Logs go to stderr so stdout stays clean for command output.
fn init_logging(config: &Config, verbose: u8) {
    let fallback = match verbose {
        0 => config.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
