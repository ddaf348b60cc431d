//! Schema setup for the `todos` table

use std::time::Duration;

use sqlx::PgPool;

/// Create the `todos` table if it does not exist.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running todo migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todos (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(200) NOT NULL CHECK (length(btrim(title)) > 0),
            completed BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Todo migrations complete");
    Ok(())
}

/// Backoff schedule for [`run_with_retry`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub factor: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            factor: 1.5,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after failed attempt `attempt` (0-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let scaled = self.initial_delay.as_secs_f64() * self.factor.powi(attempt as i32);
        Duration::from_secs_f64(scaled.min(self.max_delay.as_secs_f64()))
    }
}

/// Run migrations, retrying while the database is still coming up.
///
/// Returns the last error once `max_attempts` is exhausted.
pub async fn run_with_retry(pool: &PgPool, policy: RetryPolicy) -> Result<(), sqlx::Error> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match run(pool).await {
            Ok(()) => return Ok(()),
            Err(err) if attempt + 1 < attempts => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Migration failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
