//! todoctl-server: todo persistence layer with a thin HTTP API
//!
//! The [`db::TodoStore`] owns every statement against the `todos` table.
//! The [`http`] module only translates JSON requests into store calls.

pub mod db;
pub mod http;
pub mod models;

pub use db::{StoreError, TodoStore};
pub use models::{Keyset, Todo, TodoChanges, ValidationError};
