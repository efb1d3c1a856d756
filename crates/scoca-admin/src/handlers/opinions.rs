//! Opinion listing and the edit-opinion page.

use axum::{
  Form,
  extract::{Path, State},
  response::{Html, Redirect},
};
use scoca_core::{
  normalize::normalize_edit,
  store::{Listing, OpinionStore},
};

use crate::{
  AppState,
  error::Error,
  form::{self, Pairs},
  handlers::{OPINION_COLUMNS, OPINION_LINK, ReferenceOptions, opinion_row},
  html::{
    ResultTable, back_links, clear_checkbox, multi_select, page, select,
    submit_buttons,
  },
};

/// `GET /opinions`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: OpinionStore + Clone + 'static,
{
  let opinions = state
    .store
    .list_opinions(Listing::All)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(page("All Opinions", None, |w| {
    w.elem("h1", &[], "All Opinions");
    back_links(w, &[("/", "Back to Flagged Case Filings/Opinions")]);
    ResultTable {
      columns: OPINION_COLUMNS,
      rows:    opinions.iter().map(opinion_row).collect(),
      link:    Some(OPINION_LINK),
    }
    .write_to(w);
  }))
}

/// `GET /opinions/:id`
///
/// Only flags that are currently set are offered, as "check to clear"
/// checkboxes.
pub async fn edit_form<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Html<String>, Error>
where
  S: OpinionStore + Clone + 'static,
{
  let opinion = state
    .store
    .get_opinion(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| not_found(id))?;
  let refs = ReferenceOptions::load(&*state.store).await?;
  let record = &opinion.record;
  let docket = &record.docket_number;
  let type_id = record.type_id.to_string();
  let effective_type_id = record.effective_type_id.map(|t| t.to_string());
  let action = format!("/opinions/{id}");
  let filing_href = format!("/case-filings/{docket}");

  Ok(page(&format!("Opinion #{id}"), None, |w| {
    w.elem("h1", &[], &format!("Opinion #{id} ({docket})"));

    w.start("p", &[]);
    if let Some(url) = &opinion.case_filing_url {
      w.elem(
        "a",
        &[("href", url.as_str()), ("target", "_blank")],
        &format!("View {docket} on CourtListener"),
      )
      .empty("br", &[]);
    }
    w.link(&filing_href, &format!("Back to {docket}"))
      .empty("br", &[])
      .link("/", "Back to Flagged Case Filings/Opinions")
      .end("p");

    w.start("form", &[("action", action.as_str()), ("method", "post")]);

    w.start("div", &[]).text("FLAGS: (check to clear)").start("ul", &[]);
    if record.effective_type_flag {
      w.start("li", &[]);
      clear_checkbox(w, "effective_type_flag");
      w.end("li");
    }
    if record.no_concurrences_flag {
      w.start("li", &[]);
      clear_checkbox(w, "no_concurrences_flag");
      w.end("li");
    }
    w.end("ul").end("div");

    w.start("div", &[]).text("TYPE: ");
    select(w, "type_id", &refs.opinion_types, Some(type_id.as_str()));
    w.end("div");

    w.start("div", &[]).text("EFFECTIVE TYPE: ");
    select(
      w,
      "effective_type_id",
      &refs.opinion_types,
      effective_type_id.as_deref(),
    );
    w.text(" (ignored when TYPE is ")
      .elem("strong", &[], "NOT")
      .text(" concurring and dissenting)")
      .end("div");

    w.start("div", &[]).text("AUTHORING JUSTICE: ");
    select(
      w,
      "authoring_justice",
      &refs.justices,
      Some(record.authoring_justice.as_str()),
    );
    w.end("div");

    w.start("div", &[]).text("CONCURRING JUSTICE(S): ");
    multi_select(
      w,
      "concurring_justices",
      &refs.justices,
      &opinion.concurring_justices,
    );
    w.text(" (if AUTHORING JUSTICE is selected, it will be ignored)")
      .end("div");

    w.start("div", &[]);
    submit_buttons(w);
    w.end("div").end("form");
  }))
}

/// `POST /opinions/:id`: normalize, reconcile concurrences, then 303 back to
/// the edit page.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Form(pairs): Form<Pairs>,
) -> Result<Redirect, Error>
where
  S: OpinionStore + Clone + 'static,
{
  let edit = normalize_edit(form::opinion_submission(pairs)?)?;

  let opinion = state
    .store
    .update_opinion(id, edit)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| not_found(id))?;
  tracing::info!(
    id,
    type_id = %opinion.record.type_id,
    concurring = opinion.concurring_justices.len(),
    "updated opinion"
  );

  Ok(Redirect::to(&format!("/opinions/{id}")))
}

fn not_found(id: i64) -> Error {
  Error::NotFound(format!("No opinion exists with id {id}"))
}
