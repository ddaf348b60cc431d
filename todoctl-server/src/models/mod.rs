//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod pagination;
pub mod todo;
pub mod validation;

pub use pagination::{Keyset, KeysetParams};
pub use todo::{Todo, TodoChanges, TodoPatch, TodoTitle};
pub use validation::ValidationError;
