//! Database layer - connection pool, migrations and the todo store
//!
//! # Design Principles
//!
//! - Pool handle injected into the store, never a global
//! - Every write runs inside a scoped transaction
//! - Partial updates only name the columns they change
//! - Row locks taken by the statements themselves are the only concurrency guard

pub mod error;
pub mod migrations;
pub mod pool;
pub mod store;
pub mod transaction;
pub mod update;

pub use error::StoreError;
pub use pool::{create_pool, create_pool_with_config, AcquirePolicy, PoolConfig};
pub use store::TodoStore;
