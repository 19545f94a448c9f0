mod app;
mod auth;
mod commands;
mod config;
mod dashboard;
mod log_view;
mod logging;
mod middleware;
mod shutdown;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::config::AppConfig;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Admin Console Server - users, system settings and master data administration
#[derive(Parser)]
#[command(name = "admin-server")]
#[command(about = "Admin Console Server - users, system settings and master data administration")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database (sqlite::memory:) seeded with the default admin
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and the settings document, then exit
    Check,
    /// Create the bootstrap administrator if it does not exist
    CreateAdmin {
        #[arg(long, default_value = "admin")]
        username: String,
        #[arg(long, default_value = "admin@example.com")]
        email: String,
    },
    /// Import master data from a CSV file
    ImportMasterData {
        /// CSV file with category, code and description columns
        csv: PathBuf,
        /// Account the import runs as; rows without a known creator belong to it
        #[arg(long = "as", default_value = "admin")]
        operator: String,
    },
    /// Delete every master data record
    DeleteMasterData {
        /// Actually delete; without it only the count is reported
        #[arg(long)]
        yes: bool,
        #[arg(long = "as", default_value = "admin")]
        operator: String,
    },
    /// Show the application log, newest first
    Logs {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (ADMIN__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.mock);

    if cli.print_config {
        println!("{}", config.to_pretty_json()?);
        return Ok(());
    }

    let _log_guard = logging::init(&config.logging, cli.verbose)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Admin server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config, cli.mock).await,
        Commands::Check => commands::check(&config).await,
        Commands::CreateAdmin { username, email } => {
            commands::create_admin(&config, &username, &email).await
        }
        Commands::ImportMasterData { csv, operator } => {
            commands::import_master_data(&config, &csv, &operator).await
        }
        Commands::DeleteMasterData { yes, operator } => {
            commands::delete_master_data(&config, yes, &operator).await
        }
        Commands::Logs { page } => commands::logs(&config, page),
    }
}

async fn run_server(config: &AppConfig, mock: bool) -> Result<()> {
    let db = app::connect_database(&config.database).await?;
    let services = app::Services::build(&db, config);

    if mock {
        let (account, _) = services
            .accounts
            .ensure_admin(&config.auth.default_subject, "admin@example.com")
            .await
            .context("failed to seed mock administrator")?;
        tracing::info!(username = %account.username, "Mock database seeded with administrator");
    }

    let router = app::router(&services, config).await?;
    app::serve(router, config).await
}
