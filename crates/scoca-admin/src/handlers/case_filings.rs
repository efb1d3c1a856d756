//! Case filing pages and the new-opinion form.

use axum::{
  Form,
  extract::{Path, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
};
use scoca_core::{
  model::CaseFilingDetail,
  normalize::normalize_new,
  store::{Listing, OpinionStore},
};

use crate::{
  AppState,
  error::Error,
  form::{self, Pairs},
  handlers::{
    CASE_FILING_COLUMNS, CASE_FILING_LINK, ReferenceOptions, case_filing_row,
  },
  html::{
    HtmlWriter, ResultTable, back_links, error_notice, flag_rows, multi_select,
    page, select, submit_buttons,
  },
};

/// `GET /case-filings`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: OpinionStore + Clone + 'static,
{
  let filings = state
    .store
    .list_case_filings(Listing::All)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(page("All Case Filings", None, |w| {
    w.elem("h1", &[], "All Case Filings");
    back_links(w, &[("/", "Back to Flagged Case Filings/Opinions")]);
    ResultTable {
      columns: CASE_FILING_COLUMNS,
      rows:    filings.iter().map(case_filing_row).collect(),
      link:    Some(CASE_FILING_LINK),
    }
    .write_to(w);
  }))
}

/// `GET /case-filings/:docket`
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Path(docket_number): Path<String>,
) -> Result<Html<String>, Error>
where
  S: OpinionStore + Clone + 'static,
{
  render_detail_page(&state, &docket_number, None).await
}

/// `POST /case-filings/:docket`: set all three flags, then re-render.
///
/// A missing flag leaves the filing untouched and re-renders the page with
/// the error above it.
pub async fn update_flags<S>(
  State(state): State<AppState<S>>,
  Path(docket_number): Path<String>,
  Form(pairs): Form<Pairs>,
) -> Result<Response, Error>
where
  S: OpinionStore + Clone + 'static,
{
  let flags = match form::case_filing_flags(pairs)?.validate() {
    Ok(flags) => flags,
    Err(e) => {
      tracing::warn!(%docket_number, error = %e, "rejected case filing flags");
      let page =
        render_detail_page(&state, &docket_number, Some(&Error::from(e)))
          .await?;
      return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }
  };

  state
    .store
    .update_case_filing_flags(&docket_number, flags)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| not_found(&docket_number))?;
  tracing::info!(%docket_number, ?flags, "updated case filing flags");

  Ok(render_detail_page(&state, &docket_number, None).await?.into_response())
}

/// `GET /case-filings/:docket/opinions/new`
pub async fn new_opinion<S>(
  State(state): State<AppState<S>>,
  Path(docket_number): Path<String>,
) -> Result<Html<String>, Error>
where
  S: OpinionStore + Clone + 'static,
{
  state
    .store
    .get_case_filing(&docket_number)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| not_found(&docket_number))?;
  let refs = ReferenceOptions::load(&*state.store).await?;

  let filing_href = format!("/case-filings/{docket_number}");
  let action = format!("/case-filings/{docket_number}/opinions");

  Ok(page(&format!("New Opinion for {docket_number}"), None, |w| {
    w.elem("h1", &[], &format!("New Opinion for {docket_number}"));
    let back = format!("Back to {docket_number}");
    back_links(w, &[
      (filing_href.as_str(), back.as_str()),
      ("/", "Back to Flagged Case Filings/Opinions"),
    ]);

    w.start("form", &[("action", action.as_str()), ("method", "post")])
      .start("table", &[]);

    w.start("tr", &[]).elem("th", &[], "FLAGS:").start("td", &[]);
    w.start("table", &[]);
    flag_rows(w, &[("effective_type_flag", None), ("no_concurrences_flag", None)]);
    w.end("table").end("td").end("tr");

    w.start("tr", &[]).elem("th", &[], "TYPE:").start("td", &[]);
    select(w, "type_id", &refs.opinion_types, None);
    w.end("td").end("tr");

    w.start("tr", &[]).elem("th", &[], "EFFECTIVE TYPE:").start("td", &[]);
    select(w, "effective_type_id", &refs.opinion_types, None);
    w.text(" (ignored when TYPE is ")
      .elem("strong", &[], "NOT")
      .text(" concurring and dissenting)")
      .end("td")
      .end("tr");

    w.start("tr", &[]).elem("th", &[], "AUTHORING JUSTICE:").start("td", &[]);
    select(w, "authoring_justice", &refs.justices, None);
    w.end("td").end("tr");

    w.start("tr", &[])
      .elem("th", &[], "CONCURRING JUSTICE(S):")
      .start("td", &[]);
    multi_select(w, "concurring_justices", &refs.justices, &Default::default());
    w.text(" (if AUTHORING JUSTICE is selected, it will be ignored)")
      .end("td")
      .end("tr");

    w.start("tr", &[]).elem("td", &[], "").start("td", &[]);
    submit_buttons(w);
    w.end("td").end("tr");

    w.end("table").end("form");
  }))
}

/// `POST /case-filings/:docket/opinions`: create, then 303 to the filing.
///
/// The docket number always comes from the path.
pub async fn create_opinion<S>(
  State(state): State<AppState<S>>,
  Path(docket_number): Path<String>,
  Form(pairs): Form<Pairs>,
) -> Result<Redirect, Error>
where
  S: OpinionStore + Clone + 'static,
{
  state
    .store
    .get_case_filing(&docket_number)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| not_found(&docket_number))?;

  let mut submission = form::opinion_submission(pairs)?;
  submission.docket_number = Some(docket_number.clone());
  let input = normalize_new(submission)?;

  let opinion = state
    .store
    .create_opinion(input)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  tracing::info!(
    id = opinion.record.id,
    %docket_number,
    concurring = opinion.concurring_justices.len(),
    "created opinion"
  );

  Ok(Redirect::to(&format!("/case-filings/{docket_number}")))
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn not_found(docket_number: &str) -> Error {
  Error::NotFound(format!("No case filing exists under {docket_number}"))
}

/// The filing page: the filing itself, then the filing under its alternate
/// docket number when it has one.
async fn render_detail_page<S>(
  state: &AppState<S>,
  docket_number: &str,
  error: Option<&Error>,
) -> Result<Html<String>, Error>
where
  S: OpinionStore + Clone + 'static,
{
  let detail = state
    .store
    .get_case_filing(docket_number)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| not_found(docket_number))?;
  let refs = ReferenceOptions::load(&*state.store).await?;

  // `Some(None)`: the filing has an alternate docket number with no row.
  let alt = match detail.filing.alternate_docket_number() {
    Some(alt) => Some(
      state
        .store
        .get_case_filing(alt)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?,
    ),
    None => None,
  };

  Ok(page(&format!("Case Filing {docket_number}"), None, |w| {
    if let Some(e) = error {
      error_notice(w, &e.to_string());
    }
    back_links(w, &[("/", "Back to Flagged Case Filings/Opinions")]);
    render_filing(w, &detail, &refs, false);

    match (detail.filing.alternate_docket_number(), alt) {
      (_, Some(Some(alt_detail))) => {
        w.start("div", &[("class", "alt-case-filing")]);
        render_filing(w, &alt_detail, &refs, true);
        w.end("div");
      }
      (Some(alt_docket), Some(None)) => {
        w.elem("h2", &[], &format!("{alt_docket} is not in the database."));
      }
      _ => {}
    }
  }))
}

fn render_filing(
  w: &mut HtmlWriter,
  detail: &CaseFilingDetail,
  refs: &ReferenceOptions,
  is_alt: bool,
) {
  let f = &detail.filing;
  let heading = if is_alt { "h2" } else { "h1" };
  let docket = &f.docket_number;
  let action = format!("/case-filings/{docket}");
  let new_opinion = format!("/case-filings/{docket}/opinions/new");
  let url = f.url.as_deref().unwrap_or_default();

  w.elem(heading, &[], &format!("Case Filing {docket}"));
  w.start("table", &[]);

  w.start("tr", &[]).elem("th", &[], "FLAGS:").start("td", &[]);
  w.start("form", &[("action", action.as_str()), ("method", "post")])
    .start("table", &[]);
  flag_rows(w, &[
    ("exclude_from_chart", Some(f.exclude_from_chart)),
    ("ends_in_letter_flag", Some(f.ends_in_letter_flag)),
    ("no_opinions_flag", Some(f.no_opinions_flag)),
  ]);
  w.start("tr", &[]).elem("td", &[], "").start("td", &[]);
  submit_buttons(w);
  w.end("td").end("tr").end("table").end("form");
  w.end("td").end("tr");

  w.start("tr", &[]).elem("th", &[], "URL:").start("td", &[]);
  w.elem("a", &[("href", url), ("target", "_blank")], url);
  w.end("td").end("tr");

  let filed_on = f.filed_on.map(|d| d.to_string()).unwrap_or_default();
  let added_on = f
    .added_on
    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
    .unwrap_or_default();
  for (label, value) in [
    ("SHA1:", f.sha1.as_deref().unwrap_or_default()),
    ("FILED ON:", filed_on.as_str()),
    ("ADDED ON:", added_on.as_str()),
  ] {
    w.start("tr", &[]).elem("th", &[], label).elem("td", &[], value).end("tr");
  }

  w.start("tr", &[]).elem("th", &[], "OPINIONS:").start("td", &[]);
  if detail.opinions.is_empty() {
    w.text("No opinions.");
  } else {
    w.start("ul", &[("class", "no-bullet")]);
    for o in &detail.opinions {
      let href = format!("/opinions/{}", o.id);
      let label = format!(
        "({}) {} opinion by {}",
        o.id,
        refs.type_label(&o.type_id.to_string()).to_uppercase(),
        refs.justice_name(&o.authoring_justice),
      );
      w.start("li", &[])
        .elem("a", &[("href", href.as_str()), ("target", "_blank")], &label)
        .end("li");
    }
    w.end("ul");
  }
  w.end("td").end("tr");

  w.start("tr", &[]).elem("td", &[], "").start("td", &[]);
  w.link(&new_opinion, "Add new opinion");
  w.end("td").end("tr");

  w.end("table");
}
