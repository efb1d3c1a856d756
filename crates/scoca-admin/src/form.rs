//! Decoding of urlencoded admin form bodies.
//!
//! Forms arrive as ordered `(key, value)` pairs so repeated keys survive: the
//! concurring-justices multi-select submits one `concurring_justices[]` pair
//! per selected option. Flags are submitted as `1`/`0`; an absent flag is left
//! `None` and it is up to the normalizer whether that is allowed.

use scoca_core::{
  model::OpinionTypeId,
  normalize::{CaseFilingFlagsSubmission, OpinionSubmission},
};

use crate::error::Error;

/// A decoded `application/x-www-form-urlencoded` body.
pub type Pairs = Vec<(String, String)>;

const CONCURRING_JUSTICES: &str = "concurring_justices";

/// Build an [`OpinionSubmission`] from a form body. Unknown keys are ignored.
pub fn opinion_submission(pairs: Pairs) -> Result<OpinionSubmission, Error> {
  let mut out = OpinionSubmission::default();
  for (key, value) in pairs {
    match key.as_str() {
      "docket_number" => out.docket_number = non_empty(value),
      "type_id" => out.type_id = parse_type(&key, &value)?,
      "effective_type_id" => out.effective_type_id = parse_type(&key, &value)?,
      "authoring_justice" => out.authoring_justice = non_empty(value),
      "effective_type_flag" => {
        out.effective_type_flag = Some(parse_flag(&key, &value)?)
      }
      "no_concurrences_flag" => {
        out.no_concurrences_flag = Some(parse_flag(&key, &value)?)
      }
      k if k.strip_suffix("[]").unwrap_or(k) == CONCURRING_JUSTICES => {
        if !value.is_empty() {
          out.concurring_justices.push(value);
        }
      }
      _ => {}
    }
  }
  Ok(out)
}

/// Build a [`CaseFilingFlagsSubmission`] from a form body.
pub fn case_filing_flags(
  pairs: Pairs,
) -> Result<CaseFilingFlagsSubmission, Error> {
  let mut out = CaseFilingFlagsSubmission::default();
  for (key, value) in pairs {
    let slot = match key.as_str() {
      "exclude_from_chart" => &mut out.exclude_from_chart,
      "ends_in_letter_flag" => &mut out.ends_in_letter_flag,
      "no_opinions_flag" => &mut out.no_opinions_flag,
      _ => continue,
    };
    *slot = Some(parse_flag(&key, &value)?);
  }
  Ok(out)
}

fn non_empty(value: String) -> Option<String> {
  (!value.is_empty()).then_some(value)
}

fn parse_type(key: &str, value: &str) -> Result<Option<OpinionTypeId>, Error> {
  if value.is_empty() {
    return Ok(None);
  }
  value
    .parse()
    .map(|id| Some(OpinionTypeId(id)))
    .map_err(|_| Error::BadRequest(format!("{key}: {value:?} is not a type id")))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, Error> {
  match value {
    "1" | "true" | "on" => Ok(true),
    "0" | "false" => Ok(false),
    _ => Err(Error::BadRequest(format!("{key}: {value:?} is not a flag"))),
  }
}
