//! The `OpinionStore` trait.
//!
//! Implemented by storage backends (e.g. `scoca-store-sqlite`). The HTML admin
//! and the JSON API depend on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::{
  chart::ChartCase,
  model::{
    CaseFiling, CaseFilingDetail, CaseFilingFlags, Justice, NewOpinion, Opinion,
    OpinionEdit, OpinionRecord, OpinionType,
  },
};

/// Which rows a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Listing {
  #[default]
  All,
  /// Only rows with at least one review flag set.
  Flagged,
}

/// Abstraction over an opinion dataset backend.
///
/// Every write runs in exactly one transaction: either all of its statements
/// commit or none do.
pub trait OpinionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reference data ────────────────────────────────────────────────────

  /// All justices, ordered by shorthand.
  fn list_justices(
    &self,
  ) -> impl Future<Output = Result<Vec<Justice>, Self::Error>> + Send + '_;

  /// All opinion types, ordered by id.
  fn list_opinion_types(
    &self,
  ) -> impl Future<Output = Result<Vec<OpinionType>, Self::Error>> + Send + '_;

  // ── Case filings ──────────────────────────────────────────────────────

  /// Case filings, newest first for [`Listing::All`]; review order for
  /// [`Listing::Flagged`].
  fn list_case_filings(
    &self,
    listing: Listing,
  ) -> impl Future<Output = Result<Vec<CaseFiling>, Self::Error>> + Send + '_;

  /// A case filing with its opinions. Returns `None` if not found.
  fn get_case_filing<'a>(
    &'a self,
    docket_number: &'a str,
  ) -> impl Future<Output = Result<Option<CaseFilingDetail>, Self::Error>> + Send + 'a;

  /// Overwrite all three flags of a case filing and return the updated
  /// filing. Returns `None` if no filing has that docket number.
  fn update_case_filing_flags<'a>(
    &'a self,
    docket_number: &'a str,
    flags: CaseFilingFlags,
  ) -> impl Future<Output = Result<Option<CaseFilingDetail>, Self::Error>> + Send + 'a;

  // ── Opinions ──────────────────────────────────────────────────────────

  /// Opinion rows, by id for [`Listing::All`]; review order for
  /// [`Listing::Flagged`].
  fn list_opinions(
    &self,
    listing: Listing,
  ) -> impl Future<Output = Result<Vec<OpinionRecord>, Self::Error>> + Send + '_;

  /// An opinion with its concurring justices. Returns `None` if not found.
  fn get_opinion(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Opinion>, Self::Error>> + Send + '_;

  /// Insert a new opinion and its concurrences in one transaction.
  fn create_opinion(
    &self,
    input: NewOpinion,
  ) -> impl Future<Output = Result<Opinion, Self::Error>> + Send + '_;

  /// Update an opinion row and reconcile its concurrences in one
  /// transaction. Returns `None` if the opinion does not exist.
  fn update_opinion(
    &self,
    id: i64,
    edit: OpinionEdit,
  ) -> impl Future<Output = Result<Option<Opinion>, Self::Error>> + Send + '_;

  // ── Agreement chart ───────────────────────────────────────────────────

  /// Every majority opinion whose case filing is not excluded from the
  /// chart, ordered by docket number, each with the other opinions under
  /// its docket number.
  fn list_chart_cases(
    &self,
  ) -> impl Future<Output = Result<Vec<ChartCase>, Self::Error>> + Send + '_;
}
