//! HTTP server command
//!
//! Runs migrations (retrying while the database starts up), then serves
//! the todo API until Ctrl+C/SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use todoctl_server::db::migrations::{self, RetryPolicy};
use todoctl_server::db::pool::create_lazy_pool;
use todoctl_server::http::{run_server, ServerConfig};
use todoctl_server::TodoStore;

use super::database::DatabaseArgs;
use crate::config::TodoctlConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:8000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allowed CORS origin (repeatable, replaces the configured list)
    #[arg(long = "cors-origin", value_name = "ORIGIN")]
    pub cors_origins: Vec<String>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Skip running migrations on startup
    #[arg(long)]
    pub no_migrate: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

impl ServeArgs {
    fn server_config(&self, config: &TodoctlConfig) -> ServerConfig {
        let cors_origins = if self.cors_origins.is_empty() {
            config.server.cors_origins.clone()
        } else {
            self.cors_origins.clone()
        };

        ServerConfig {
            bind_addr: self.bind.unwrap_or(config.server.bind),
            cors_origins,
            cors_permissive: self.cors_permissive || config.server.cors_permissive,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: TodoctlConfig) -> Result<()> {
    let database_url = args.db.database_url(&config);
    let pool_config = args.db.pool_config(&config);
    let server_config = args.server_config(&config);

    tracing::info!(
        bind = %server_config.bind_addr,
        max_connections = pool_config.max_connections,
        "Starting todoctl server"
    );

    // Lazy so a database that is still starting doesn't abort startup;
    // the migration retry loop waits for it instead.
    let pool = create_lazy_pool(&database_url, &pool_config)
        .context("Invalid database URL")?;

    if config.database.migrate_on_start && !args.no_migrate {
        migrations::run_with_retry(&pool, RetryPolicy::default())
            .await
            .context("Failed to run migrations")?;
    }

    run_server(TodoStore::new(pool.clone()), server_config)
        .await
        .context("Server error")?;

    pool.close().await;
    Ok(())
}
