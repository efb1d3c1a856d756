//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  NotFound(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("could not update, {0}")]
  Validation(#[from] scoca_core::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      e @ Error::Validation(_) => {
        (StatusCode::BAD_REQUEST, e.to_string()).into_response()
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store error");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
      }
    }
  }
}
