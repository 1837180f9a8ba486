//! Loadwatch CLI
//!
//! Console dashboard for an EV charge controller: follows the live
//! telemetry feed and reads or switches the charging mode.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use loadwatch::api::ModeClient;
use loadwatch::io::ReqwestHttpClient;
use loadwatch::{load_config, Config};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "loadwatch")]
#[command(about = "Console dashboard and mode control for an EV charge controller")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Controller host (overrides config file)
    #[arg(long)]
    host: Option<String>,

    /// Controller port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Reach the controller over https/wss (overrides config file)
    #[arg(long)]
    secure: bool,

    /// Log level
    #[arg(short, long, default_value = "info", value_parser = clap::value_parser!(Level))]
    log_level: Level,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the controller's live telemetry (the default)
    Watch,

    /// Show the current charge mode, or switch to a new one
    Mode {
        /// Mode to switch to; the controller decides whether it is legal
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    debug!(
        "Parsed command line arguments: config={:?}, host={:?}, port={:?}, log_level={:?}",
        args.config, args.host, args.port, args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        debug!("Using default configuration");
        Config::default()
    };

    if let Some(host) = args.host {
        config.controller.host = host;
    }
    if let Some(port) = args.port {
        config.controller.port = port;
    }
    if args.secure {
        config.controller.secure = true;
    }

    match args.command.unwrap_or(Commands::Watch) {
        Commands::Watch => {
            tracing::info!("Watching controller at {}", config.controller.api_base());
            loadwatch::run(config).await?;
        }
        Commands::Mode { value } => {
            run_mode(&config, value).await?;
        }
    }

    Ok(())
}

async fn run_mode(
    config: &Config,
    value: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = ModeClient::new(
        config.controller.api_base(),
        Arc::new(ReqwestHttpClient::new()),
    );

    let mode = match value {
        Some(value) => client.set_mode(&value).await?,
        None => client.current_mode().await?,
    };

    println!("{}", mode);
    Ok(())
}
