//! Scoped transactions
//!
//! [`scoped`] begins a transaction, runs the body against it, commits when
//! the body returns `Ok` and rolls back when it returns `Err`. If the
//! returned future is dropped mid-flight (caller cancelled or timed out),
//! the sqlx `Transaction` guard is dropped with it and the rollback runs
//! before its connection goes back to the pool.

use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};

use super::StoreError;

/// Run `body` inside a transaction on a connection acquired from `pool`.
///
/// ```ignore
/// let todo = scoped(&pool, move |conn| {
///     Box::pin(async move {
///         let todo = sqlx::query_as("...").fetch_one(&mut *conn).await?;
///         Ok(todo)
///     })
/// })
/// .await?;
/// ```
pub async fn scoped<T, F>(pool: &PgPool, body: F) -> Result<T, StoreError>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, StoreError>>,
{
    let mut tx = pool.begin().await?;

    match body(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            tracing::debug!("transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, cause = %err, "transaction rollback failed");
                return Err(StoreError::Storage(rollback_err));
            }
            tracing::debug!(cause = %err, "transaction rolled back");
            Err(err)
        }
    }
}
