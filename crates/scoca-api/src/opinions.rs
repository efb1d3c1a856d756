//! Handlers for `/opinions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/opinions/:id` | Opinion with concurring justices |
//! | `POST` | `/opinions` | Body: [`OpinionSubmission`]; returns 201 + stored opinion |
//! | `PUT`  | `/opinions/:id` | Body: [`OpinionSubmission`]; omitted flags are kept |
//!
//! Both writes normalize the submission first: the effective type is dropped
//! unless the type is "concurring and dissenting", and the author is removed
//! from the concurring justices.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use scoca_core::{
  model::Opinion,
  normalize::{OpinionSubmission, normalize_edit, normalize_new},
  store::OpinionStore,
};

use crate::error::ApiError;

/// `GET /opinions/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Opinion>, ApiError>
where
  S: OpinionStore,
{
  let opinion = store
    .get_opinion(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("opinion {id} not found")))?;
  Ok(Json(opinion))
}

/// `POST /opinions`: returns 201 + the stored [`Opinion`], or 404 if the
/// docket number names no case filing.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<OpinionSubmission>,
) -> Result<impl IntoResponse, ApiError>
where
  S: OpinionStore,
{
  let input = normalize_new(body)?;
  store
    .get_case_filing(&input.docket_number)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!(
        "no case filing exists under {}",
        input.docket_number
      ))
    })?;

  let opinion = store
    .create_opinion(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(opinion)))
}

/// `PUT /opinions/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<OpinionSubmission>,
) -> Result<Json<Opinion>, ApiError>
where
  S: OpinionStore,
{
  let edit = normalize_edit(body)?;
  let opinion = store
    .update_opinion(id, edit)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("opinion {id} not found")))?;
  Ok(Json(opinion))
}
