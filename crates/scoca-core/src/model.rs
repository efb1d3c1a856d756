//! Data model for the opinion dataset.
//!
//! Case filings and opinions are ingested by separate tooling; this system
//! reads and edits them. Concurrences are the only rows it creates and
//! destroys outright.

use std::{collections::BTreeSet, fmt};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ─── Reference data ──────────────────────────────────────────────────────────

/// Primary key of a row in `opinion_types`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OpinionTypeId(pub i64);

impl OpinionTypeId {
  pub const MAJORITY: Self = Self(1);
  pub const CONCURRING: Self = Self(2);
  pub const DISSENTING: Self = Self(3);
  /// The only type for which an effective type is stored.
  pub const CONCURRING_AND_DISSENTING: Self = Self(4);

  /// Whether opinions of this type carry an effective type.
  pub fn takes_effective_type(self) -> bool {
    self == Self::CONCURRING_AND_DISSENTING
  }
}

impl fmt::Display for OpinionTypeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// An opinion type with its display label, e.g. `4 - concurring and dissenting`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpinionType {
  pub id:    OpinionTypeId,
  pub label: String,
}

/// A justice, keyed by a short code such as `"RG"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Justice {
  pub shorthand: String,
  pub fullname:  String,
}

// ─── Case filings ────────────────────────────────────────────────────────────

/// A case filing row. The docket number is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFiling {
  pub docket_number:       String,
  pub url:                 Option<String>,
  pub sha1:                Option<String>,
  pub filed_on:            Option<NaiveDate>,
  /// Set by the database when the ingestion tool inserted the row.
  pub added_on:            Option<NaiveDateTime>,
  pub exclude_from_chart:  bool,
  pub ends_in_letter_flag: bool,
  pub no_opinions_flag:    bool,
}

impl CaseFiling {
  /// The docket number this filing would have without its trailing letter,
  /// e.g. `S123456` for `S123456A`. `None` if the last character is not an
  /// ASCII letter.
  pub fn alternate_docket_number(&self) -> Option<&str> {
    alternate_docket_number(&self.docket_number)
  }
}

/// Strip a trailing ASCII letter from a docket number.
pub fn alternate_docket_number(docket_number: &str) -> Option<&str> {
  let last = docket_number.chars().next_back()?;
  if !last.is_ascii_alphabetic() {
    return None;
  }
  let stem = &docket_number[..docket_number.len() - last.len_utf8()];
  (!stem.is_empty()).then_some(stem)
}

/// The three editable flags on a case filing. Updates always set all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFilingFlags {
  pub exclude_from_chart:  bool,
  pub ends_in_letter_flag: bool,
  pub no_opinions_flag:    bool,
}

/// A case filing together with the opinions filed under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFilingDetail {
  #[serde(flatten)]
  pub filing:   CaseFiling,
  pub opinions: Vec<OpinionRecord>,
}

// ─── Opinions ────────────────────────────────────────────────────────────────

/// A row of the `opinions` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpinionRecord {
  pub id:                   i64,
  pub docket_number:        String,
  pub type_id:              OpinionTypeId,
  pub effective_type_id:    Option<OpinionTypeId>,
  pub authoring_justice:    String,
  pub effective_type_flag:  bool,
  pub no_concurrences_flag: bool,
}

/// An opinion as shown on its edit page: the row, the source URL of its case
/// filing, and the justices who concur with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opinion {
  #[serde(flatten)]
  pub record:              OpinionRecord,
  pub case_filing_url:     Option<String>,
  pub concurring_justices: BTreeSet<String>,
}

/// A normalized opinion ready to be inserted.
///
/// Produced by [`crate::normalize::normalize_new`]; the effective type is
/// already cleared for types that don't take one and the authoring justice is
/// already absent from `concurring_justices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOpinion {
  pub docket_number:        String,
  pub type_id:              OpinionTypeId,
  pub effective_type_id:    Option<OpinionTypeId>,
  pub authoring_justice:    String,
  pub effective_type_flag:  bool,
  pub no_concurrences_flag: bool,
  pub concurring_justices:  BTreeSet<String>,
}

/// A normalized edit of an existing opinion.
///
/// A flag left as `None` keeps its stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpinionEdit {
  pub type_id:              OpinionTypeId,
  pub effective_type_id:    Option<OpinionTypeId>,
  pub authoring_justice:    String,
  pub effective_type_flag:  Option<bool>,
  pub no_concurrences_flag: Option<bool>,
  pub concurring_justices:  BTreeSet<String>,
}

// ─── Tests ────────────────────────────────────────────────────────────────────
