//! Handlers for `/case-filings` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/case-filings/:docket` | Filing with its opinions; 404 if not found |
//! | `PUT`  | `/case-filings/:docket/flags` | Body: all three flags |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use scoca_core::{
  model::CaseFilingDetail, normalize::CaseFilingFlagsSubmission,
  store::OpinionStore,
};

use crate::error::ApiError;

/// `GET /case-filings/:docket`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(docket_number): Path<String>,
) -> Result<Json<CaseFilingDetail>, ApiError>
where
  S: OpinionStore,
{
  let detail = store
    .get_case_filing(&docket_number)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no case filing exists under {docket_number}"))
    })?;
  Ok(Json(detail))
}

/// `PUT /case-filings/:docket/flags`, body:
/// `{"exclude_from_chart":..,"ends_in_letter_flag":..,"no_opinions_flag":..}`
pub async fn update_flags<S>(
  State(store): State<Arc<S>>,
  Path(docket_number): Path<String>,
  Json(body): Json<CaseFilingFlagsSubmission>,
) -> Result<Json<CaseFilingDetail>, ApiError>
where
  S: OpinionStore,
{
  let flags = body.validate()?;
  let detail = store
    .update_case_filing_flags(&docket_number, flags)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no case filing exists under {docket_number}"))
    })?;
  Ok(Json(detail))
}
