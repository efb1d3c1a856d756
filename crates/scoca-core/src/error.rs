//! Error types for `scoca-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A submitted record lacks a field the operation requires.
  #[error("a required field is missing: {0}")]
  MissingField(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
