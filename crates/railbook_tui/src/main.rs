//! Railbook TUI Entry Point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use railbook_client::config::{build_config, CliArgs};
use railbook_client::{ApiClient, FileStorage};
use railbook_tui::logging::init_file_logging;
use railbook_tui::prelude::*;

/// Terminal client for the Railbook booking service
#[derive(Parser)]
#[command(name = "railbook-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Local storage file holding the session token
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Path to open first
    #[arg(default_value = "/")]
    path: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = build_config(&CliArgs {
        config_file: args.config,
        base_url: args.base_url,
        storage_path: args.storage,
        log_level: args.log_level,
        log_file: args.log_file,
    })?;

    // Logs go to a file only; the terminal is drawn on
    let _guard = init_file_logging(&config)?;
    tracing::info!(base_url = %config.base_url, "Railbook TUI starting");

    let storage = Arc::new(FileStorage::new(&config.storage_path));
    let api = Arc::new(ApiClient::from_config(&config, storage.clone())?);

    let mut app = TuiApp::new(api, storage)?;
    app.run(&args.path).await?;

    Ok(())
}
