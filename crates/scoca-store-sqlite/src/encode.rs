//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Flags are stored as integers `0`/`1`. `filed_on` is a `YYYY-MM-DD` date;
//! `added_on` is whatever SQLite's `CURRENT_TIMESTAMP` produced.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use scoca_core::model::{
  CaseFiling, CaseFilingDetail, Opinion, OpinionRecord, OpinionTypeId,
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── Flags ───────────────────────────────────────────────────────────────────

pub fn encode_flag(flag: bool) -> i64 { i64::from(flag) }

pub fn decode_flag(value: i64) -> bool { value != 0 }

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn encode_timestamp(dt: NaiveDateTime) -> String {
  dt.format(TIMESTAMP_FORMAT).to_string()
}

pub fn decode_timestamp(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `case_filings` row.
pub struct RawCaseFiling {
  pub docket_number:       String,
  pub url:                 Option<String>,
  pub sha1:                Option<String>,
  pub filed_on:            Option<String>,
  pub added_on:            Option<String>,
  pub exclude_from_chart:  i64,
  pub ends_in_letter_flag: i64,
  pub no_opinions_flag:    i64,
}

/// Column list matching [`RawCaseFiling::from_row`].
pub const CASE_FILING_COLUMNS: &str = "docket_number, url, sha1, filed_on, added_on, \
   exclude_from_chart, ends_in_letter_flag, no_opinions_flag";

impl RawCaseFiling {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      docket_number:       row.get(0)?,
      url:                 row.get(1)?,
      sha1:                row.get(2)?,
      filed_on:            row.get(3)?,
      added_on:            row.get(4)?,
      exclude_from_chart:  row.get(5)?,
      ends_in_letter_flag: row.get(6)?,
      no_opinions_flag:    row.get(7)?,
    })
  }

  pub fn into_case_filing(self) -> Result<CaseFiling> {
    Ok(CaseFiling {
      docket_number:       self.docket_number,
      url:                 self.url,
      sha1:                self.sha1,
      filed_on:            self.filed_on.as_deref().map(decode_date).transpose()?,
      added_on:            self
        .added_on
        .as_deref()
        .map(decode_timestamp)
        .transpose()?,
      exclude_from_chart:  decode_flag(self.exclude_from_chart),
      ends_in_letter_flag: decode_flag(self.ends_in_letter_flag),
      no_opinions_flag:    decode_flag(self.no_opinions_flag),
    })
  }
}

/// Raw values read directly from an `opinions` row.
pub struct RawOpinionRecord {
  pub id:                   i64,
  pub docket_number:        String,
  pub type_id:              i64,
  pub effective_type_id:    Option<i64>,
  pub authoring_justice:    String,
  pub effective_type_flag:  i64,
  pub no_concurrences_flag: i64,
}

/// Column list matching [`RawOpinionRecord::from_row`], qualified by `o.`.
pub const OPINION_COLUMNS: &str = "o.id, o.docket_number, o.type_id, o.effective_type_id, \
   o.authoring_justice, o.effective_type_flag, o.no_concurrences_flag";

impl RawOpinionRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      docket_number:        row.get(1)?,
      type_id:              row.get(2)?,
      effective_type_id:    row.get(3)?,
      authoring_justice:    row.get(4)?,
      effective_type_flag:  row.get(5)?,
      no_concurrences_flag: row.get(6)?,
    })
  }

  pub fn into_record(self) -> OpinionRecord {
    OpinionRecord {
      id:                   self.id,
      docket_number:        self.docket_number,
      type_id:              OpinionTypeId(self.type_id),
      effective_type_id:    self.effective_type_id.map(OpinionTypeId),
      authoring_justice:    self.authoring_justice,
      effective_type_flag:  decode_flag(self.effective_type_flag),
      no_concurrences_flag: decode_flag(self.no_concurrences_flag),
    }
  }
}

/// An opinion row joined with its case filing URL and concurrence rows.
pub struct RawOpinion {
  pub record:              RawOpinionRecord,
  pub case_filing_url:     Option<String>,
  pub concurring_justices: BTreeSet<String>,
}

impl RawOpinion {
  pub fn into_opinion(self) -> Opinion {
    Opinion {
      record:              self.record.into_record(),
      case_filing_url:     self.case_filing_url,
      concurring_justices: self.concurring_justices,
    }
  }
}

/// A case filing row with the opinion rows filed under it.
pub struct RawCaseFilingDetail {
  pub filing:   RawCaseFiling,
  pub opinions: Vec<RawOpinionRecord>,
}

impl RawCaseFilingDetail {
  pub fn into_detail(self) -> Result<CaseFilingDetail> {
    Ok(CaseFilingDetail {
      filing:   self.filing.into_case_filing()?,
      opinions: self
        .opinions
        .into_iter()
        .map(RawOpinionRecord::into_record)
        .collect(),
    })
  }
}
