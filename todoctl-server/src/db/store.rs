//! Todo store
//!
//! Owns every statement against the `todos` table:
//! - list: keyset pagination ordered by id
//! - create: INSERT ... RETURNING inside a transaction (single round trip)
//! - update: dynamic SET list, only supplied columns, row lock via UPDATE
//! - delete: affected-row count decides existence

use sqlx::PgPool;
use tracing::instrument;

use super::transaction::scoped;
use super::update::TodoUpdate;
use super::StoreError;
use crate::models::{Keyset, Todo, TodoChanges, TodoPatch, TodoTitle};

/// Todo repository.
///
/// Holds only a pool handle; clones share the pool.
#[derive(Debug, Clone)]
pub struct TodoStore {
    pool: PgPool,
}

impl TodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// List todos ascending by id.
    ///
    /// With a [`Keyset`], returns at most `limit` rows with `id > after_id`.
    #[instrument(skip(self))]
    pub async fn list(&self, page: Option<Keyset>) -> Result<Vec<Todo>, StoreError> {
        let page = page.unwrap_or_default();

        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, completed
            FROM todos
            WHERE id > $1
            ORDER BY id ASC
            LIMIT $2
            "#,
        )
        .bind(page.sql_after_id())
        .bind(page.sql_limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    /// Get a single todo by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Todo, StoreError> {
        sqlx::query_as::<_, Todo>("SELECT id, title, completed FROM todos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { id })
    }

    /// Insert a new todo with `completed = false`.
    ///
    /// The title is trimmed; empty or over-long titles fail before any
    /// transaction is opened.
    #[instrument(skip(self, title))]
    pub async fn create(&self, title: &str) -> Result<Todo, StoreError> {
        let title = TodoTitle::new(title)?;

        let todo = scoped(&self.pool, move |conn| {
            Box::pin(async move {
                let todo = sqlx::query_as::<_, Todo>(
                    r#"
                    INSERT INTO todos (title, completed)
                    VALUES ($1, FALSE)
                    RETURNING id, title, completed
                    "#,
                )
                .bind(title.into_string())
                .fetch_one(&mut *conn)
                .await?;
                Ok(todo)
            })
        })
        .await?;

        tracing::debug!(id = todo.id, "todo created");
        Ok(todo)
    }

    /// Apply a partial update and return the row as it now stands.
    ///
    /// Only supplied fields appear in the statement, so a concurrent update
    /// of a different field is never overwritten. Concurrent updates of the
    /// same row wait on the row lock held by the first `UPDATE`.
    #[instrument(skip(self, changes), fields(title = changes.title.is_some(), completed = ?changes.completed))]
    pub async fn update(&self, id: i64, changes: TodoChanges) -> Result<Todo, StoreError> {
        let patch = TodoPatch::try_from(changes)?;
        let mut query = TodoUpdate::from(patch).into_query(id)?;

        scoped(&self.pool, move |conn| {
            Box::pin(async move {
                query
                    .build_query_as::<Todo>()
                    .fetch_optional(&mut *conn)
                    .await?
                    .ok_or(StoreError::NotFound { id })
            })
        })
        .await
    }

    /// Permanently delete a todo.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        scoped(&self.pool, move |conn| {
            Box::pin(async move {
                let result = sqlx::query("DELETE FROM todos WHERE id = $1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;

                if result.rows_affected() == 0 {
                    return Err(StoreError::NotFound { id });
                }
                Ok(())
            })
        })
        .await
    }
}
