//! Database flags shared by every command

use clap::Args;
use todoctl_server::db::{AcquirePolicy, PoolConfig};

use crate::config::TodoctlConfig;

#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Fail immediately instead of queueing when every connection is busy
    #[arg(long)]
    pub fail_fast: bool,
}

impl DatabaseArgs {
    pub fn database_url(&self, config: &TodoctlConfig) -> String {
        config.database_url(self.database_url.clone())
    }

    pub fn pool_config(&self, config: &TodoctlConfig) -> PoolConfig {
        let mut pool = config.database.pool;
        if let Some(max) = self.max_connections {
            pool.max_connections = max;
        }
        if self.fail_fast {
            pool.acquire = AcquirePolicy::FailFast;
        }
        pool
    }
}
