//! Error type for `scoca-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A row written inside a transaction could not be read back.
  #[error("opinion not found: {0}")]
  OpinionNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
