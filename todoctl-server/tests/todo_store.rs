//! TodoStore integration tests against a real PostgreSQL.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p todoctl-server -- --ignored
//!
//! Every test gets its own schema (via `search_path`), so tests can run in
//! parallel against one database.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;
use sqlx::PgPool;
use todoctl_server::db::migrations;
use todoctl_server::db::pool::{create_pool, create_pool_with_options, PoolConfig};
use todoctl_server::{Keyset, StoreError, TodoChanges, TodoStore, ValidationError};
use tracing_subscriber::EnvFilter;

struct TestDb {
    store: TodoStore,
    admin: PgPool,
    schema: String,
}

impl TestDb {
    async fn new() -> Self {
        Self::with_config(PoolConfig::default()).await
    }

    async fn with_config(config: PoolConfig) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let admin = create_pool(&url).await.expect("admin pool");

        let schema = format!("todo_test_{}", uuid::Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE SCHEMA \"{schema}\""))
            .execute(&admin)
            .await
            .expect("create schema");

        let options = PgConnectOptions::from_str(&url)
            .expect("valid DATABASE_URL")
            .options([("search_path", schema.as_str())]);
        let pool = create_pool_with_options(options, &config)
            .await
            .expect("isolated pool");
        migrations::run(&pool).await.expect("migrations");

        Self {
            store: TodoStore::new(pool),
            admin,
            schema,
        }
    }

    async fn seed(&self, titles: &[&str]) -> Vec<i64> {
        let mut ids = Vec::with_capacity(titles.len());
        for title in titles {
            ids.push(self.store.create(title).await.expect("seed").id);
        }
        ids
    }

    async fn ids(&self) -> Vec<i64> {
        self.store
            .list(None)
            .await
            .expect("list")
            .into_iter()
            .map(|t| t.id)
            .collect()
    }

    async fn cleanup(self) {
        self.store.pool().close().await;
        let _ = sqlx::query(&format!("DROP SCHEMA \"{}\" CASCADE", self.schema))
            .execute(&self.admin)
            .await;
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_then_get_returns_trimmed_title() {
    let db = TestDb::new().await;

    let created = db.store.create("  write tests  ").await.unwrap();
    assert_eq!(created.title, "write tests");
    assert!(!created.completed);

    let fetched = db.store.get(created.id).await.unwrap();
    assert_eq!(fetched, created);

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn blank_titles_are_rejected_and_nothing_persisted() {
    let db = TestDb::new().await;
    db.seed(&["existing"]).await;
    let before = db.ids().await;

    for title in ["", "   "] {
        let err = db.store.create(title).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::Empty { .. })
        ));
    }

    assert_eq!(db.ids().await, before);
    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn completed_update_keeps_title() {
    let db = TestDb::new().await;
    let id = db.seed(&["keep me"]).await[0];

    let updated = db.store.update(id, TodoChanges::completed(true)).await.unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "keep me");

    let fetched = db.store.get(id).await.unwrap();
    assert_eq!(fetched.title, "keep me");
    assert!(fetched.completed);

    // and back again
    let updated = db.store.update(id, TodoChanges::completed(false)).await.unwrap();
    assert!(!updated.completed);

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn title_update_keeps_completed() {
    let db = TestDb::new().await;
    let id = db.seed(&["old"]).await[0];
    db.store.update(id, TodoChanges::completed(true)).await.unwrap();

    let updated = db.store.update(id, TodoChanges::title(" new ")).await.unwrap();
    assert_eq!(updated.title, "new");
    assert!(updated.completed);

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn empty_update_is_rejected_and_row_unchanged() {
    let db = TestDb::new().await;
    let id = db.seed(&["untouched"]).await[0];
    let before = db.store.get(id).await.unwrap();

    let err = db.store.update(id, TodoChanges::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(ValidationError::NoFields)));

    let err = db.store.update(id, TodoChanges::title("  ")).await.unwrap_err();
    assert!(err.is_validation());

    assert_eq!(db.store.get(id).await.unwrap(), before);
    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_missing_id_is_not_found() {
    let db = TestDb::new().await;

    let err = db
        .store
        .update(999_999, TodoChanges::title("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { id: 999_999 }));

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_removes_row_and_repeat_is_not_found() {
    let db = TestDb::new().await;
    let id = db.seed(&["doomed"]).await[0];

    db.store.delete(id).await.unwrap();
    assert!(db.store.get(id).await.unwrap_err().is_not_found());
    assert!(db.store.delete(id).await.unwrap_err().is_not_found());

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn ids_are_never_reused() {
    let db = TestDb::new().await;
    let first = db.seed(&["a"]).await[0];
    db.store.delete(first).await.unwrap();

    let second = db.store.create("b").await.unwrap();
    assert!(second.id > first);

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn list_is_ascending_by_id() {
    let db = TestDb::new().await;
    let ids = db.seed(&["c", "a", "b"]).await;

    let titles: Vec<_> = db
        .store
        .list(None)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["c", "a", "b"]);
    assert_eq!(db.ids().await, ids);

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn keyset_page_returns_rows_after_cursor() {
    let db = TestDb::new().await;
    let ids = db.seed(&["1", "2", "3", "4", "5"]).await;

    let page = db
        .store
        .list(Some(Keyset::after(ids[1], 2)))
        .await
        .unwrap();
    let page_ids: Vec<_> = page.iter().map(|t| t.id).collect();
    assert_eq!(page_ids, vec![ids[2], ids[3]]);

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn zero_limit_returns_empty_page() {
    let db = TestDb::new().await;
    let ids = db.seed(&["1", "2", "3"]).await;

    let page = db.store.list(Some(Keyset::new(Some(0), None))).await.unwrap();
    assert!(page.is_empty());

    let page = db.store.list(Some(Keyset::after(ids[0], 0))).await.unwrap();
    assert!(page.is_empty());

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn repeated_keyset_pages_stay_consistent() {
    let db = TestDb::new().await;
    let ids = db.seed(&["1", "2", "3", "4", "5", "6", "7", "8"]).await;

    // Enough executions for PostgreSQL to switch to a generic plan
    for _ in 0..8 {
        let first = db.store.list(Some(Keyset::first(3))).await.unwrap();
        let first_ids: Vec<_> = first.iter().map(|t| t.id).collect();
        assert_eq!(first_ids, ids[..3]);

        let next = db.store.list(Some(Keyset::after(ids[5], 3))).await.unwrap();
        let next_ids: Vec<_> = next.iter().map(|t| t.id).collect();
        assert_eq!(next_ids, ids[6..]);
    }

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn keyset_traversal_survives_delete_ahead_of_cursor() {
    let db = TestDb::new().await;
    let ids = db.seed(&["1", "2", "3", "4", "5"]).await;

    let mut seen = Vec::new();
    let mut cursor = Some(Keyset::first(2));
    let mut deleted = false;

    while let Some(page) = cursor {
        let todos = db.store.list(Some(page)).await.unwrap();
        seen.extend(todos.iter().map(|t| t.id));

        if !deleted {
            db.store.delete(ids[2]).await.unwrap();
            deleted = true;
        }
        cursor = page.next_after(&todos);
    }

    assert_eq!(seen, vec![ids[0], ids[1], ids[3], ids[4]]);
    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn concurrent_disjoint_updates_both_land() {
    let db = TestDb::new().await;

    for round in 0..10 {
        let id = db.store.create("original").await.unwrap().id;
        let new_title = format!("renamed {round}");

        let (renamed, completed) = tokio::join!(
            db.store.update(id, TodoChanges::title(new_title.clone())),
            db.store.update(id, TodoChanges::completed(true)),
        );
        renamed.unwrap();
        completed.unwrap();

        let row = db.store.get(id).await.unwrap();
        assert_eq!(row.title, new_title);
        assert!(row.completed);
    }

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_waits_for_row_lock_holder() {
    let db = TestDb::new().await;
    let id = db.seed(&["locked"]).await[0];

    let mut holder = db.store.pool().begin().await.unwrap();
    sqlx::query("UPDATE todos SET title = 'held' WHERE id = $1")
        .bind(id)
        .execute(&mut *holder)
        .await
        .unwrap();

    let store = db.store.clone();
    let mut waiting =
        tokio::spawn(async move { store.update(id, TodoChanges::completed(true)).await });

    // Still blocked on the row lock
    assert!(tokio::time::timeout(Duration::from_millis(300), &mut waiting)
        .await
        .is_err());

    holder.commit().await.unwrap();

    let updated = waiting.await.unwrap().unwrap();
    assert_eq!(updated.title, "held");
    assert!(updated.completed);

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn cancelled_update_never_commits() {
    let db = TestDb::with_config(PoolConfig {
        max_connections: 2,
        min_connections: 0,
        ..PoolConfig::default()
    })
    .await;
    let id = db.seed(&["stable"]).await[0];

    let mut holder = db.store.pool().begin().await.unwrap();
    sqlx::query("SELECT id FROM todos WHERE id = $1 FOR UPDATE")
        .bind(id)
        .execute(&mut *holder)
        .await
        .unwrap();

    // Caller gives up while the update waits on the lock
    let cancelled = tokio::time::timeout(
        Duration::from_millis(200),
        db.store.update(id, TodoChanges::title("cancelled")),
    )
    .await;
    assert!(cancelled.is_err());

    holder.rollback().await.unwrap();

    // Both pooled connections are usable again and the title never changed
    let updated = db.store.update(id, TodoChanges::completed(true)).await.unwrap();
    assert_eq!(updated.title, "stable");
    assert_eq!(db.store.get(id).await.unwrap().title, "stable");

    db.cleanup().await;
}
