//! Core types and trait definitions for the SCOCA opinion admin.
//!
//! No HTTP or database code lives here. The crate holds the data model, the
//! field normalizer applied to every submitted opinion, the membership
//! reconciler that keeps concurrence rows in step with an edit form, and the
//! agreement chart tally.

pub mod chart;
pub mod error;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod store;

pub use error::{Error, Result};
