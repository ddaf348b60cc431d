//! Command implementations for todoctl CLI

pub mod check;
pub mod database;
pub mod migrate;
pub mod serve;

pub use check::run_check;
pub use migrate::run_migrate;
pub use serve::run_serve;
