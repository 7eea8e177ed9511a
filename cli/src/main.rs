//! Parking Fees CLI server
//!
//! ```sh
//! # Run with default config (~/.config/parking-fees/config.toml)
//! parking-fees
//!
//! # Custom config path and port
//! parking-fees --config /etc/parking-fees/config.toml --port 9000
//!
//! # Validate config without starting
//! parking-fees --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use parking_fees::config::AppConfig;
use parking_fees::server::{init_tracing, ServerHandle};

/// Parking fee calculation service.
#[derive(Parser, Debug)]
#[command(
    name = "parking-fees",
    version,
    about = "Fixed and tiered parking fee calculation service",
    long_about = "REST API for parking fee previews, pricing templates and per-lot quotes.\n\n\
                  Default config: ~/.config/parking-fees/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PARKING_FEES_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(parking_fees::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if cli.check {
        if let Some(e) = load_error {
            eprintln!("Invalid configuration {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
        println!("Configuration is valid");
        println!("   Config file  : {}", config_path.display());
        println!("   Address      : {}", config.server.address());
        println!("   Log level    : {} ({})", config.logging.level, config.logging.format);
        println!("   Free minutes : {}", config.pricing.default_free_minutes);
        println!("   Seed templates: {}", config.pricing.seed_default_templates);
        return Ok(());
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
    }

    let handle = ServerHandle::start(config).await?;
    handle.install_signal_handler();

    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
