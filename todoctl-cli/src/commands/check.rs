//! Database connectivity probe

use anyhow::{bail, Result};
use clap::Parser;
use todoctl_server::db::pool::ping;
use todoctl_server::db::{create_pool_with_config, AcquirePolicy};

use super::database::DatabaseArgs;
use crate::config::TodoctlConfig;

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Seconds to wait for a connection
    #[arg(long, default_value_t = 5)]
    pub timeout_secs: u64,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Connect and run `SELECT 1`, printing OK or FAILED
pub async fn run_check(args: CheckArgs, config: TodoctlConfig) -> Result<()> {
    let mut pool_config = args.db.pool_config(&config);
    pool_config.min_connections = 0;
    pool_config.acquire = AcquirePolicy::Wait {
        timeout_ms: args.timeout_secs.saturating_mul(1000),
    };
    let database_url = args.db.database_url(&config);

    let outcome: Result<()> = async {
        let pool = create_pool_with_config(&database_url, &pool_config).await?;
        ping(&pool).await?;
        pool.close().await;
        Ok::<(), anyhow::Error>(())
    }
    .await;

    match outcome {
        Ok(()) => {
            println!("database connection: OK");
            Ok(())
        }
        Err(err) => {
            println!("database connection: FAILED {err}");
            bail!("database check failed")
        }
    }
}
