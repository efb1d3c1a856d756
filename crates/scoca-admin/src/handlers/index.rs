//! `GET /`: the rows still needing review.
//!
//! Flagged case filings sort as `no_opinions_flag DESC, ends_in_letter_flag`,
//! which groups them by docket shape:
//!
//! - `S######`: no opinions, no trailing letter
//! - `S######M`: no opinions, trailing letter
//! - `S######A`: opinions, no trailing letter

use axum::{extract::State, response::Html};
use scoca_core::store::{Listing, OpinionStore};

use crate::{
  AppState,
  error::Error,
  handlers::{
    CASE_FILING_COLUMNS, CASE_FILING_LINK, OPINION_COLUMNS, OPINION_LINK,
    case_filing_row, opinion_row,
  },
  html::{ResultTable, page},
};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: OpinionStore + Clone + 'static,
{
  let filings = state
    .store
    .list_case_filings(Listing::Flagged)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let opinions = state
    .store
    .list_opinions(Listing::Flagged)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(page("SCOCA Admin", None, |w| {
    w.elem("h1", &[], "SCOCA Agreement Chart Admin Interface");
    w.start("p", &[])
      .link("/case-filings", "All case filings")
      .text(" | ")
      .link("/opinions", "All opinions")
      .text(" | ")
      .link("/chart", "Agreement chart")
      .end("p");

    w.elem("h2", &[], "Flagged Case Filings");
    if filings.is_empty() {
      w.elem("p", &[], "No flagged case filings.");
    } else {
      ResultTable {
        columns: CASE_FILING_COLUMNS,
        rows:    filings.iter().map(case_filing_row).collect(),
        link:    Some(CASE_FILING_LINK),
      }
      .write_to(w);
    }

    w.elem("h2", &[], "Flagged Opinions");
    if opinions.is_empty() {
      w.elem("p", &[], "No flagged opinions.");
    } else {
      ResultTable {
        columns: OPINION_COLUMNS,
        rows:    opinions.iter().map(opinion_row).collect(),
        link:    Some(OPINION_LINK),
      }
      .write_to(w);
    }
  }))
}
