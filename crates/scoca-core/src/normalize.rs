//! Field normalization for submitted opinions.
//!
//! Every opinion write passes through here before touching storage. Two rules
//! apply regardless of what the client sent:
//!
//! - the effective type survives only when the type is "concurring and
//!   dissenting"; for any other type it is overwritten with `None`;
//! - the authoring justice is removed from the concurring justices.
//!
//! Case filing flag submissions are validated here too.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::{
  Error, Result,
  model::{CaseFilingFlags, NewOpinion, OpinionEdit, OpinionTypeId},
};

// ─── Submission ──────────────────────────────────────────────────────────────

/// An opinion as submitted by a form or API client, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OpinionSubmission {
  pub docket_number:        Option<String>,
  pub type_id:              Option<OpinionTypeId>,
  pub effective_type_id:    Option<OpinionTypeId>,
  pub authoring_justice:    Option<String>,
  pub effective_type_flag:  Option<bool>,
  pub no_concurrences_flag: Option<bool>,
  #[serde(default)]
  pub concurring_justices:  Vec<String>,
}

/// Case filing flags as submitted. All three are required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CaseFilingFlagsSubmission {
  pub exclude_from_chart:  Option<bool>,
  pub ends_in_letter_flag: Option<bool>,
  pub no_opinions_flag:    Option<bool>,
}

impl CaseFilingFlagsSubmission {
  pub fn validate(self) -> Result<CaseFilingFlags> {
    Ok(CaseFilingFlags {
      exclude_from_chart:  self
        .exclude_from_chart
        .ok_or(Error::MissingField("exclude_from_chart"))?,
      ends_in_letter_flag: self
        .ends_in_letter_flag
        .ok_or(Error::MissingField("ends_in_letter_flag"))?,
      no_opinions_flag:    self
        .no_opinions_flag
        .ok_or(Error::MissingField("no_opinions_flag"))?,
    })
  }
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// The effective type to store for an opinion of type `type_id`.
pub fn effective_type_for(
  type_id: OpinionTypeId,
  candidate: Option<OpinionTypeId>,
) -> Option<OpinionTypeId> {
  if type_id.takes_effective_type() { candidate } else { None }
}

/// Remove every occurrence of `authoring_justice` from `candidates`, keeping
/// the order of the rest.
pub fn strip_self_concurrence(
  authoring_justice: &str,
  candidates: impl IntoIterator<Item = String>,
) -> Vec<String> {
  candidates
    .into_iter()
    .filter(|j| j != authoring_justice)
    .collect()
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Validate and normalize a submission for insertion.
///
/// Every field is required, including both flags. The effective type is only
/// required when the type takes one.
pub fn normalize_new(submission: OpinionSubmission) -> Result<NewOpinion> {
  let docket_number = submission
    .docket_number
    .filter(|d| !d.is_empty())
    .ok_or(Error::MissingField("docket_number"))?;
  let core = normalize_core(
    submission.type_id,
    submission.effective_type_id,
    submission.authoring_justice,
    submission.concurring_justices,
  )?;
  let effective_type_flag = submission
    .effective_type_flag
    .ok_or(Error::MissingField("effective_type_flag"))?;
  let no_concurrences_flag = submission
    .no_concurrences_flag
    .ok_or(Error::MissingField("no_concurrences_flag"))?;

  Ok(NewOpinion {
    docket_number,
    type_id: core.type_id,
    effective_type_id: core.effective_type_id,
    authoring_justice: core.authoring_justice,
    effective_type_flag,
    no_concurrences_flag,
    concurring_justices: core.concurring_justices,
  })
}

/// Validate and normalize a submission editing an existing opinion.
///
/// Flags may be omitted to leave the stored value untouched. The docket
/// number is ignored; opinions never move between case filings.
pub fn normalize_edit(submission: OpinionSubmission) -> Result<OpinionEdit> {
  let core = normalize_core(
    submission.type_id,
    submission.effective_type_id,
    submission.authoring_justice,
    submission.concurring_justices,
  )?;

  Ok(OpinionEdit {
    type_id:              core.type_id,
    effective_type_id:    core.effective_type_id,
    authoring_justice:    core.authoring_justice,
    effective_type_flag:  submission.effective_type_flag,
    no_concurrences_flag: submission.no_concurrences_flag,
    concurring_justices:  core.concurring_justices,
  })
}

struct CoreFields {
  type_id:             OpinionTypeId,
  effective_type_id:   Option<OpinionTypeId>,
  authoring_justice:   String,
  concurring_justices: BTreeSet<String>,
}

fn normalize_core(
  type_id: Option<OpinionTypeId>,
  effective_type_id: Option<OpinionTypeId>,
  authoring_justice: Option<String>,
  concurring_justices: Vec<String>,
) -> Result<CoreFields> {
  let type_id = type_id.ok_or(Error::MissingField("type_id"))?;
  let authoring_justice = authoring_justice
    .filter(|j| !j.is_empty())
    .ok_or(Error::MissingField("authoring_justice"))?;
  if type_id.takes_effective_type() && effective_type_id.is_none() {
    return Err(Error::MissingField("effective_type_id"));
  }

  Ok(CoreFields {
    type_id,
    effective_type_id: effective_type_for(type_id, effective_type_id),
    concurring_justices: strip_self_concurrence(
      &authoring_justice,
      concurring_justices,
    )
    .into_iter()
    .collect(),
    authoring_justice,
  })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
