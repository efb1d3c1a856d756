//! SQLite backend for the SCOCA opinion admin.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each write opens one
//! [`rusqlite::Transaction`]; dropping it on an error path rolls back.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
