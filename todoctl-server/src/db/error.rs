//! Store error type

use crate::models::ValidationError;

/// Error returned by every [`TodoStore`](super::TodoStore) operation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("not found: todo '{id}'")]
    NotFound { id: i64 },

    /// Connection, statement, commit or rollback failure
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// No pooled connection became free within the acquire timeout.
    pub fn is_pool_exhausted(&self) -> bool {
        matches!(self, Self::Storage(sqlx::Error::PoolTimedOut))
    }
}
