//! HTML admin interface for the SCOCA opinion dataset.
//!
//! Exposes an axum [`Router`] serving the review pages for case filings and
//! opinions and the agreement chart, backed by any [`OpinionStore`]. The JSON API from `scoca-api`
//! is mounted under `/api`.

pub mod error;
pub mod form;
pub mod handlers;
pub mod html;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use scoca_core::{model::Justice, store::OpinionStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{case_filings, chart, index, opinions};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Reference rows inserted at startup if missing.
  #[serde(default)]
  pub justices:   Vec<Justice>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: OpinionStore> {
  pub store: Arc<S>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the admin [`Router`], with the JSON API nested under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: OpinionStore + Clone + 'static,
{
  let api = scoca_api::api_router(state.store.clone());

  Router::new()
    .route("/", get(index::handler::<S>))
    .route("/case-filings", get(case_filings::list::<S>))
    .route(
      "/case-filings/{docket}",
      get(case_filings::show::<S>).post(case_filings::update_flags::<S>),
    )
    .route(
      "/case-filings/{docket}/opinions/new",
      get(case_filings::new_opinion::<S>),
    )
    .route(
      "/case-filings/{docket}/opinions",
      post(case_filings::create_opinion::<S>),
    )
    .route("/opinions", get(opinions::list::<S>))
    .route("/chart", get(chart::handler::<S>))
    .route(
      "/opinions/{id}",
      get(opinions::edit_form::<S>).post(opinions::update::<S>),
    )
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
