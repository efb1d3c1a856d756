pub mod case_filings;
pub mod chart;
pub mod index;
pub mod opinions;

use scoca_core::{
  model::{CaseFiling, OpinionRecord},
  store::OpinionStore,
};

use crate::{
  error::Error,
  html::{Link, flag_cell},
};

/// Select options for justices and opinion types, as `(key, label)` pairs.
pub(crate) struct ReferenceOptions {
  pub justices:      Vec<(String, String)>,
  pub opinion_types: Vec<(String, String)>,
}

impl ReferenceOptions {
  pub(crate) async fn load<S: OpinionStore>(store: &S) -> Result<Self, Error> {
    let justices = store
      .list_justices()
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
      .into_iter()
      .map(|j| (j.shorthand, j.fullname))
      .collect();
    let opinion_types = store
      .list_opinion_types()
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
      .into_iter()
      .map(|t| (t.id.to_string(), t.label))
      .collect();
    Ok(Self { justices, opinion_types })
  }

  pub(crate) fn justice_name<'a>(&'a self, shorthand: &'a str) -> &'a str {
    lookup(&self.justices, shorthand)
  }

  pub(crate) fn type_label<'a>(&'a self, id: &'a str) -> &'a str {
    lookup(&self.opinion_types, id)
  }
}

fn lookup<'a>(options: &'a [(String, String)], key: &'a str) -> &'a str {
  options
    .iter()
    .find(|(k, _)| k == key)
    .map_or(key, |(_, label)| label.as_str())
}

// ─── Table rows ──────────────────────────────────────────────────────────────

pub(crate) const CASE_FILING_COLUMNS: &[&str] = &[
  "docket_number",
  "url",
  "sha1",
  "filed_on",
  "added_on",
  "exclude_from_chart",
  "no_opinions_flag",
  "ends_in_letter_flag",
];

pub(crate) const CASE_FILING_LINK: Link = Link {
  column: 0,
  href:   |docket| format!("/case-filings/{docket}"),
};

pub(crate) fn case_filing_row(f: &CaseFiling) -> Vec<Option<String>> {
  vec![
    Some(f.docket_number.clone()),
    f.url.clone(),
    f.sha1.clone(),
    f.filed_on.map(|d| d.to_string()),
    f.added_on.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
    flag_cell(f.exclude_from_chart),
    flag_cell(f.no_opinions_flag),
    flag_cell(f.ends_in_letter_flag),
  ]
}

pub(crate) const OPINION_COLUMNS: &[&str] = &[
  "id",
  "docket_number",
  "type_id",
  "effective_type_id",
  "authoring_justice",
  "effective_type_flag",
  "no_concurrences_flag",
];

pub(crate) const OPINION_LINK: Link = Link {
  column: 0,
  href:   |id| format!("/opinions/{id}"),
};

pub(crate) fn opinion_row(o: &OpinionRecord) -> Vec<Option<String>> {
  vec![
    Some(o.id.to_string()),
    Some(o.docket_number.clone()),
    Some(o.type_id.to_string()),
    o.effective_type_id.map(|t| t.to_string()),
    Some(o.authoring_justice.clone()),
    flag_cell(o.effective_type_flag),
    flag_cell(o.no_concurrences_flag),
  ]
}
