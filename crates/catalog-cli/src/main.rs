//! Catalog CLI - Command-line client for the product catalog service.

use catalog_cli::commands;
use catalog_cli::repl;
use catalog_cli::{Cli, CliError, Command, Config, Formatter};
use catalog_curator::Controller;
use catalog_sdk::CatalogClient;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `CATALOG_LOG` takes an `EnvFilter` directive.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CATALOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run() -> catalog_cli::Result<()> {
    let cli = Cli::parse();

    // An explicit config file must load; the default one falls back to defaults
    let mut config = match &cli.config {
        Some(path) => Config::load_from(Path::new(path))?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Using default configuration");
            let cfg = Config::default();
            cfg.save().ok();
            cfg
        }),
    };

    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&mut config, cli.url.as_deref(), &formatter).await?;
        }
        Some(Command::Profile(args)) => {
            commands::execute_profile(args, &mut config, &formatter).await?;
        }
        Some(cmd @ (Command::Queue | Command::Save(_) | Command::Clear)) => {
            return Err(CliError::ReplOnly(cmd.name()));
        }
        Some(cmd) => {
            let url = config.service_url(cli.url.as_deref())?;
            tracing::debug!(url = %url, command = cmd.name(), "Running command");

            let controller = Controller::new(CatalogClient::new(&url), config.curator.clone());
            commands::execute(cmd, &controller, &mut config, &formatter).await?;
        }
    }

    Ok(())
}
