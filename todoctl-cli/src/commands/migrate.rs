//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;
use todoctl_server::db::migrations::{self, RetryPolicy};
use todoctl_server::db::pool::create_lazy_pool;

use super::database::DatabaseArgs;
use crate::config::TodoctlConfig;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Connection attempts before giving up
    #[arg(long, default_value_t = 10)]
    pub attempts: u32,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Create the todos table and exit
pub async fn run_migrate(args: MigrateArgs, config: TodoctlConfig) -> Result<()> {
    let pool = create_lazy_pool(&args.db.database_url(&config), &args.db.pool_config(&config))
        .context("Invalid database URL")?;

    let policy = RetryPolicy {
        max_attempts: args.attempts,
        ..RetryPolicy::default()
    };
    migrations::run_with_retry(&pool, policy)
        .await
        .context("Failed to run migrations")?;

    pool.close().await;
    println!("migrations: OK");
    Ok(())
}
