//! JSON endpoint server entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use json_endpoints::config::Config;
use json_endpoints::loader::load_endpoints;
use json_endpoints::{metrics, server};

/// Serve a directory of JSON files as filterable GET endpoints.
#[derive(Parser, Debug)]
#[command(name = "json-endpoints")]
#[command(about = "Serve a directory of JSON files as filterable HTTP GET endpoints")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the data directory (default).
    Serve {
        /// HTTP server port.
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of JSON files.
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// List the routes the data directory would produce.
    List {
        /// Directory of JSON files.
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("json_endpoints=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::Serve { port, data_dir }) => cmd_serve(port, data_dir).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::List { data_dir }) => cmd_list(data_dir),
        None => cmd_serve(None, None).await,
    }
}

/// Load and validate configuration, applying CLI overrides.
fn load_config(port: Option<u16>, data_dir: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port {
        config.port = port;
    }
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("JSON ENDPOINTS - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Checking data directory... ");
    if config.data_dir.is_dir() {
        println!("OK");
    } else {
        println!("FAILED");
        println!("  Error: {} is not a directory", config.data_dir.display());
        return Err(anyhow::anyhow!("Data directory missing"));
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Data directory: {}", config.data_dir.display());
    println!("  Listen address: {}", config.socket_addr());
    println!(
        "  Route prefix:   {}",
        if config.route_prefix.is_empty() { "(none)" } else { config.route_prefix.as_str() }
    );
    println!("  Metrics:        {}", if config.enable_metrics { "enabled" } else { "disabled" });
    println!("======================================================================");

    Ok(())
}

/// Print the routes the data directory would produce.
fn cmd_list(data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(None, data_dir)?;
    let endpoints = load_endpoints(&config.data_dir)?;

    println!("{:<40} {:<16} FIELDS", "ROUTE", "KIND");
    for endpoint in &endpoints {
        let summary = endpoint.summary();
        let fields: Vec<String> = summary
            .fields
            .iter()
            .map(|f| format!("{}:{}", f.name, f.kind))
            .collect();
        println!(
            "{:<40} {:<16} {}",
            format!("{}{}", config.route_prefix, summary.route),
            summary.kind.to_string(),
            fields.join(", ")
        );
    }
    println!("{} endpoint(s)", endpoints.len());

    Ok(())
}

/// Serve the data directory until shutdown.
async fn cmd_serve(port: Option<u16>, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config(port, data_dir)?;

    let prometheus = if config.enable_metrics {
        match metrics::install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Metrics disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    if let Err(e) = server::run(&config, prometheus).await {
        error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
