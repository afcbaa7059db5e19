//! Railbook CLI - Command Line Client for the Train Booking Service
//!
//! # Commands
//!
//! - `railbook login` / `logout` / `whoami` / `register` - Account session
//! - `railbook search --from SBC --to MAS` - Find trains between stations
//! - `railbook book --train 1 --name ... --age ... --gender ...` - Book a seat
//! - `railbook bookings [--all]` / `railbook cancel <id>` - Manage bookings
//! - `railbook locations ...` / `trains ...` / `users` - Admin management
//! - `railbook check` - Backend health
//!
//! The session token is shared with `railbook-tui` through the same storage
//! file, so logging in with one front-end logs in the other.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use railbook_client::config::{build_config, CliArgs};
use railbook_client::{ApiClient, FileStorage, LogLevel};
use railbook_core::forms::{BookingDraft, LoginDraft, RegisterDraft};
use railbook_core::models::GENDER_OPTIONS;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;
mod output;
#[cfg(test)]
mod testing;

pub use error::{CliError, Result};

use commands::locations::LocationCommand;
use commands::trains::TrainCommand;
use commands::Context;
use output::OutputFormat;

/// Railbook train booking CLI
#[derive(Parser)]
#[command(name = "railbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Local storage file holding the session token
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password; prompted for when omitted
        #[arg(short, long, env = "RAILBOOK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show the logged-in account
    Whoami,

    /// Create an account
    Register {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Username
        #[arg(short, long)]
        username: String,

        /// Full name
        #[arg(long, default_value = "")]
        full_name: String,

        /// Password; prompted for when omitted
        #[arg(short, long, env = "RAILBOOK_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Register as an administrator
        #[arg(long)]
        admin: bool,
    },

    /// Search trains between stations (id or code)
    Search {
        /// Origin station
        #[arg(long)]
        from: Option<String>,

        /// Destination station
        #[arg(long)]
        to: Option<String>,
    },

    /// Book a seat
    Book {
        /// Train id
        #[arg(short, long)]
        train: i64,

        /// Passenger name
        #[arg(short, long)]
        name: String,

        /// Passenger age
        #[arg(short, long)]
        age: String,

        /// Passenger gender
        #[arg(short, long, value_parser = GENDER_OPTIONS)]
        gender: String,

        /// Journey date (YYYY-MM-DD); defaults to tomorrow
        #[arg(short, long, default_value = "")]
        date: String,
    },

    /// List bookings
    Bookings {
        /// Every user's bookings (admin)
        #[arg(long)]
        all: bool,
    },

    /// Cancel a booking
    Cancel {
        /// Booking id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Manage stations
    Locations {
        #[command(subcommand)]
        command: LocationCommand,
    },

    /// List and manage trains
    Trains {
        #[command(subcommand)]
        command: TrainCommand,
    },

    /// List registered users (admin)
    Users,

    /// Check that the backend is reachable
    Check,
}

fn init_logging(level: LogLevel, verbose: bool) {
    let level = if verbose { "debug" } else { level.as_filter_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "railbook_cli={0},railbook_client={0},railbook_core={0}",
            level
        ))
    });

    // Stdout carries command output; logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn read_password(given: Option<String>, input: &mut dyn BufRead) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// One-line message printed when a command fails
fn error_line(err: &CliError) -> String {
    format!("Error: {}", err)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_line(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&CliArgs {
        config_file: cli.config,
        base_url: cli.base_url,
        storage_path: cli.storage,
        log_level: cli.log_level,
        log_file: None,
    })?;
    init_logging(config.log_level, cli.verbose);
    debug!(
        base_url = %config.base_url,
        storage = %config.storage_path.display(),
        "Configuration loaded"
    );

    let storage = Arc::new(FileStorage::new(&config.storage_path));
    let api = ApiClient::from_config(&config, storage.clone())?;
    let ctx = Context {
        api: &api,
        storage: storage.as_ref(),
        format: cli.format,
        today: Local::now().date_naive(),
    };

    let mut out = io::stdout().lock();
    let mut input = io::stdin().lock();

    match cli.command {
        Commands::Login { username, password } => {
            let draft = LoginDraft {
                username,
                password: read_password(password, &mut input)?,
            };
            commands::auth::login(&ctx, &mut out, &draft).await
        }
        Commands::Logout => commands::auth::logout(&ctx, &mut out),
        Commands::Whoami => commands::auth::whoami(&ctx, &mut out).await,
        Commands::Register {
            email,
            username,
            full_name,
            password,
            admin,
        } => {
            let draft = RegisterDraft {
                email,
                username,
                full_name,
                password: read_password(password, &mut input)?,
                as_admin: admin,
            };
            commands::auth::register(&ctx, &mut out, &draft).await
        }
        Commands::Search { from, to } => {
            commands::search::run(&ctx, &mut out, from.as_deref(), to.as_deref()).await
        }
        Commands::Book {
            train,
            name,
            age,
            gender,
            date,
        } => {
            let draft = BookingDraft {
                passenger_name: name,
                passenger_age: age,
                passenger_gender: gender,
                journey_date: date,
            };
            commands::bookings::book(&ctx, &mut out, train, &draft).await
        }
        Commands::Bookings { all } => commands::bookings::list(&ctx, &mut out, all).await,
        Commands::Cancel { id, yes } => {
            commands::bookings::cancel(&ctx, &mut input, &mut out, id, yes).await
        }
        Commands::Locations { command } => {
            commands::locations::run(&ctx, &mut input, &mut out, &command).await
        }
        Commands::Trains { command } => {
            commands::trains::run(&ctx, &mut input, &mut out, &command).await
        }
        Commands::Users => commands::users::run(&ctx, &mut out).await,
        Commands::Check => commands::check::run(&ctx, &mut out, &config.base_url).await,
    }
}
