//! JSON REST API for the SCOCA opinion dataset.
//!
//! Exposes an axum [`Router`] backed by any [`scoca_core::store::OpinionStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", scoca_api::api_router(store.clone()))
//! ```

pub mod case_filings;
pub mod error;
pub mod opinions;
pub mod reference;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use scoca_core::store::OpinionStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: OpinionStore + 'static,
{
  Router::new()
    // Reference data
    .route("/justices", get(reference::justices::<S>))
    .route("/opinion-types", get(reference::opinion_types::<S>))
    // Case filings
    .route("/case-filings/{docket}", get(case_filings::get_one::<S>))
    .route("/case-filings/{docket}/flags", put(case_filings::update_flags::<S>))
    // Opinions
    .route("/opinions", post(opinions::create::<S>))
    .route(
      "/opinions/{id}",
      get(opinions::get_one::<S>).put(opinions::update::<S>),
    )
    .with_state(store)
}
