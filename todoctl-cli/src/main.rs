//! todoctl CLI - todo API server and database tooling
//!
//! - `serve`: run migrations, then the HTTP API
//! - `migrate`: create the todos table and exit
//! - `check`: probe database connectivity

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

mod commands;
mod config;
mod tracing_setup;

use config::TodoctlConfig;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "todoctl",
    author,
    version,
    about = "Todo tracking API backed by PostgreSQL"
)]
struct Cli {
    /// Config file (default: ./todoctl.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the todos table and exit
    Migrate(commands::migrate::MigrateArgs),
    /// Check database connectivity (SELECT 1)
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so DATABASE_URL from .env reaches clap's env fallback
    let dotenv_files = config::load_dotenv();

    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    for path in &dotenv_files {
        info!("Loaded environment from {}", path.display());
    }

    let config = TodoctlConfig::load(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await,
        Commands::Migrate(args) => commands::run_migrate(args, config).await,
        Commands::Check(args) => commands::run_check(args, config).await,
    };

    tracing_setup::shutdown_otel();
    result
}
