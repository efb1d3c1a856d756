//! Handlers for the static reference tables.

use std::sync::Arc;

use axum::{Json, extract::State};
use scoca_core::{
  model::{Justice, OpinionType},
  store::OpinionStore,
};

use crate::error::ApiError;

/// `GET /justices`
pub async fn justices<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Justice>>, ApiError>
where
  S: OpinionStore,
{
  let justices = store
    .list_justices()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(justices))
}

/// `GET /opinion-types`
pub async fn opinion_types<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<OpinionType>>, ApiError>
where
  S: OpinionStore,
{
  let types = store
    .list_opinion_types()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(types))
}
