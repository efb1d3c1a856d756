//! [`SqliteStore`], the SQLite implementation of [`OpinionStore`].

use std::{collections::BTreeSet, path::Path};

use rusqlite::{Connection, OptionalExtension as _, Transaction};
use scoca_core::{
  chart::{ChartCase, ChartOpinion},
  model::{
    CaseFiling, CaseFilingDetail, CaseFilingFlags, Justice, NewOpinion, Opinion,
    OpinionEdit, OpinionRecord, OpinionType, OpinionTypeId,
  },
  reconcile::MembershipDiff,
  store::{Listing, OpinionStore},
};

use crate::{
  Error, Result,
  encode::{
    CASE_FILING_COLUMNS, OPINION_COLUMNS, RawCaseFiling, RawCaseFilingDetail,
    RawOpinion, RawOpinionRecord, encode_date, encode_flag, encode_timestamp,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An opinion dataset backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. There is no
/// process-wide handle; callers pass a store into whatever needs one.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a justice unless one with the same shorthand already exists.
  ///
  /// Returns `true` if a row was inserted.
  pub async fn add_justice(&self, justice: Justice) -> Result<bool> {
    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT OR IGNORE INTO justices (shorthand, fullname) VALUES (?1, ?2)",
          rusqlite::params![justice.shorthand, justice.fullname],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(inserted)
  }

  /// Insert a case filing. Used by importers; the admin never creates
  /// filings. A missing `added_on` falls back to the column default.
  pub async fn add_case_filing(&self, filing: CaseFiling) -> Result<()> {
    let filed_on = filing.filed_on.map(encode_date);
    let added_on = filing.added_on.map(encode_timestamp);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO case_filings (
             docket_number, url, sha1, filed_on, added_on,
             exclude_from_chart, ends_in_letter_flag, no_opinions_flag
           ) VALUES (?1, ?2, ?3, ?4, COALESCE(?5, CURRENT_TIMESTAMP), ?6, ?7, ?8)",
          rusqlite::params![
            filing.docket_number,
            filing.url,
            filing.sha1,
            filed_on,
            added_on,
            encode_flag(filing.exclude_from_chart),
            encode_flag(filing.ends_in_letter_flag),
            encode_flag(filing.no_opinions_flag),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────
//
// These run on the connection thread, inside `call`. They take `&Connection`
// so they work equally on a bare connection or an open transaction.

fn read_concurrences(
  conn: &Connection,
  opinion_id: i64,
) -> rusqlite::Result<BTreeSet<String>> {
  let mut stmt =
    conn.prepare("SELECT justice FROM concurrences WHERE opinion_id = ?1")?;
  let justices = stmt
    .query_map(rusqlite::params![opinion_id], |row| row.get(0))?
    .collect::<rusqlite::Result<BTreeSet<String>>>()?;
  Ok(justices)
}

fn read_opinion(
  conn: &Connection,
  opinion_id: i64,
) -> rusqlite::Result<Option<RawOpinion>> {
  let row = conn
    .query_row(
      &format!(
        "SELECT {OPINION_COLUMNS}, cf.url
         FROM opinions o
         LEFT JOIN case_filings cf ON cf.docket_number = o.docket_number
         WHERE o.id = ?1"
      ),
      rusqlite::params![opinion_id],
      |row| Ok((RawOpinionRecord::from_row(row)?, row.get::<_, Option<String>>(7)?)),
    )
    .optional()?;

  let Some((record, case_filing_url)) = row else {
    return Ok(None);
  };
  let concurring_justices = read_concurrences(conn, opinion_id)?;
  Ok(Some(RawOpinion { record, case_filing_url, concurring_justices }))
}

fn read_case_filing(
  conn: &Connection,
  docket_number: &str,
) -> rusqlite::Result<Option<RawCaseFilingDetail>> {
  let filing = conn
    .query_row(
      &format!(
        "SELECT {CASE_FILING_COLUMNS} FROM case_filings WHERE docket_number = ?1"
      ),
      rusqlite::params![docket_number],
      RawCaseFiling::from_row,
    )
    .optional()?;

  let Some(filing) = filing else {
    return Ok(None);
  };

  let mut stmt = conn.prepare(&format!(
    "SELECT {OPINION_COLUMNS} FROM opinions o WHERE o.docket_number = ?1 ORDER BY o.id"
  ))?;
  let opinions = stmt
    .query_map(rusqlite::params![docket_number], RawOpinionRecord::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Some(RawCaseFilingDetail { filing, opinions }))
}

/// The opinion row `raw` with its concurring justices, for the chart.
fn read_chart_opinion(
  conn: &Connection,
  raw: RawOpinionRecord,
) -> rusqlite::Result<ChartOpinion> {
  let record = raw.into_record();
  let concurring_justices = read_concurrences(conn, record.id)?;
  Ok(ChartOpinion {
    id: record.id,
    type_id: record.type_id,
    effective_type_id: record.effective_type_id,
    authoring_justice: record.authoring_justice,
    concurring_justices,
  })
}

fn read_chart_cases(conn: &Connection) -> rusqlite::Result<Vec<ChartCase>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {OPINION_COLUMNS}
     FROM opinions o
     JOIN case_filings cf ON cf.docket_number = o.docket_number
     WHERE o.type_id = ?1 AND cf.exclude_from_chart = 0
     ORDER BY o.docket_number, o.id"
  ))?;
  let majorities = stmt
    .query_map(
      rusqlite::params![OpinionTypeId::MAJORITY.0],
      RawOpinionRecord::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut secondary_stmt = conn.prepare(&format!(
    "SELECT {OPINION_COLUMNS} FROM opinions o
     WHERE o.docket_number = ?1 AND o.type_id <> ?2
     ORDER BY o.type_id, o.effective_type_id, o.authoring_justice"
  ))?;

  let mut cases = Vec::with_capacity(majorities.len());
  for raw in majorities {
    let docket_number = raw.docket_number.clone();
    let majority = read_chart_opinion(conn, raw)?;
    let secondary = secondary_stmt
      .query_map(
        rusqlite::params![docket_number, OpinionTypeId::MAJORITY.0],
        RawOpinionRecord::from_row,
      )?
      .collect::<rusqlite::Result<Vec<_>>>()?
      .into_iter()
      .map(|raw| read_chart_opinion(conn, raw))
      .collect::<rusqlite::Result<Vec<_>>>()?;
    cases.push(ChartCase { docket_number, majority, secondary });
  }
  Ok(cases)
}

/// Issue the deletes, then the inserts, of `diff` against `opinion_id`.
/// A no-op diff issues no statements at all.
fn apply_membership_diff(
  tx: &Transaction<'_>,
  opinion_id: i64,
  diff: &MembershipDiff,
) -> rusqlite::Result<()> {
  if diff.is_noop() {
    return Ok(());
  }

  if !diff.to_delete.is_empty() {
    let mut delete = tx.prepare(
      "DELETE FROM concurrences WHERE opinion_id = ?1 AND justice = ?2",
    )?;
    for justice in &diff.to_delete {
      delete.execute(rusqlite::params![opinion_id, justice])?;
    }
  }

  if !diff.to_insert.is_empty() {
    let mut insert = tx
      .prepare("INSERT INTO concurrences (opinion_id, justice) VALUES (?1, ?2)")?;
    for justice in &diff.to_insert {
      insert.execute(rusqlite::params![opinion_id, justice])?;
    }
  }

  tracing::debug!(
    opinion_id,
    deleted = diff.to_delete.len(),
    inserted = diff.to_insert.len(),
    "reconciled concurrences"
  );
  Ok(())
}

// ─── OpinionStore impl ───────────────────────────────────────────────────────

impl OpinionStore for SqliteStore {
  type Error = Error;

  // ── Reference data ────────────────────────────────────────────────────────

  async fn list_justices(&self) -> Result<Vec<Justice>> {
    let justices = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT shorthand, fullname FROM justices ORDER BY shorthand")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Justice {
              shorthand: row.get(0)?,
              fullname:  row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(justices)
  }

  async fn list_opinion_types(&self) -> Result<Vec<OpinionType>> {
    let types = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT id, type FROM opinion_types ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(OpinionType {
              id:    OpinionTypeId(row.get(0)?),
              label: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(types)
  }

  // ── Case filings ──────────────────────────────────────────────────────────

  async fn list_case_filings(&self, listing: Listing) -> Result<Vec<CaseFiling>> {
    // Flagged order groups S######, S######M and S######A dockets together.
    let sql = match listing {
      Listing::All => format!(
        "SELECT {CASE_FILING_COLUMNS} FROM case_filings
         ORDER BY filed_on DESC, added_on DESC, docket_number"
      ),
      Listing::Flagged => format!(
        "SELECT {CASE_FILING_COLUMNS} FROM case_filings
         WHERE ends_in_letter_flag = 1 OR no_opinions_flag = 1
         ORDER BY no_opinions_flag DESC, ends_in_letter_flag, filed_on, added_on"
      ),
    };

    let raws: Vec<RawCaseFiling> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawCaseFiling::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCaseFiling::into_case_filing).collect()
  }

  async fn get_case_filing<'a>(
    &'a self,
    docket_number: &'a str,
  ) -> Result<Option<CaseFilingDetail>> {
    let docket_number = docket_number.to_owned();

    let raw = self
      .conn
      .call(move |conn| Ok(read_case_filing(conn, &docket_number)?))
      .await?;

    raw.map(RawCaseFilingDetail::into_detail).transpose()
  }

  async fn update_case_filing_flags<'a>(
    &'a self,
    docket_number: &'a str,
    flags: CaseFilingFlags,
  ) -> Result<Option<CaseFilingDetail>> {
    let docket_number = docket_number.to_owned();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE case_filings SET
             exclude_from_chart  = ?1,
             ends_in_letter_flag = ?2,
             no_opinions_flag    = ?3
           WHERE docket_number = ?4",
          rusqlite::params![
            encode_flag(flags.exclude_from_chart),
            encode_flag(flags.ends_in_letter_flag),
            encode_flag(flags.no_opinions_flag),
            docket_number,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let detail = read_case_filing(&tx, &docket_number)?;
        tx.commit()?;
        Ok(detail)
      })
      .await?;

    let detail = raw.map(RawCaseFilingDetail::into_detail).transpose()?;
    if let Some(d) = &detail {
      tracing::debug!(docket_number = %d.filing.docket_number, "updated case filing flags");
    }
    Ok(detail)
  }

  // ── Opinions ──────────────────────────────────────────────────────────────

  async fn list_opinions(&self, listing: Listing) -> Result<Vec<OpinionRecord>> {
    let sql = match listing {
      Listing::All => {
        format!("SELECT {OPINION_COLUMNS} FROM opinions o ORDER BY o.id")
      }
      Listing::Flagged => format!(
        "SELECT {OPINION_COLUMNS} FROM opinions o
         WHERE o.no_concurrences_flag = 1 OR o.effective_type_flag = 1
         ORDER BY o.effective_type_flag DESC, o.no_concurrences_flag DESC,
                  o.docket_number, o.type_id, o.effective_type_id"
      ),
    };

    let raws: Vec<RawOpinionRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawOpinionRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawOpinionRecord::into_record).collect())
  }

  async fn get_opinion(&self, id: i64) -> Result<Option<Opinion>> {
    let raw = self
      .conn
      .call(move |conn| Ok(read_opinion(conn, id)?))
      .await?;
    Ok(raw.map(RawOpinion::into_opinion))
  }

  async fn create_opinion(&self, input: NewOpinion) -> Result<Opinion> {
    let (id, raw) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO opinions (
             docket_number, type_id, effective_type_id, authoring_justice,
             effective_type_flag, no_concurrences_flag
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            input.docket_number,
            input.type_id.0,
            input.effective_type_id.map(|t| t.0),
            input.authoring_justice,
            encode_flag(input.effective_type_flag),
            encode_flag(input.no_concurrences_flag),
          ],
        )?;
        // The natural key is not unique, so take the rowid SQLite assigned.
        let id = tx.last_insert_rowid();

        let diff = MembershipDiff::from_empty(&input.concurring_justices);
        apply_membership_diff(&tx, id, &diff)?;

        let raw = read_opinion(&tx, id)?;
        tx.commit()?;
        Ok((id, raw))
      })
      .await?;

    let opinion = raw
      .map(RawOpinion::into_opinion)
      .ok_or(Error::OpinionNotFound(id))?;
    tracing::debug!(
      opinion_id = id,
      docket_number = %opinion.record.docket_number,
      concurrences = opinion.concurring_justices.len(),
      "created opinion"
    );
    Ok(opinion)
  }

  async fn update_opinion(
    &self,
    id: i64,
    edit: OpinionEdit,
  ) -> Result<Option<Opinion>> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE opinions SET
             type_id              = ?1,
             effective_type_id    = ?2,
             authoring_justice    = ?3,
             effective_type_flag  = COALESCE(?4, effective_type_flag),
             no_concurrences_flag = COALESCE(?5, no_concurrences_flag)
           WHERE id = ?6",
          rusqlite::params![
            edit.type_id.0,
            edit.effective_type_id.map(|t| t.0),
            edit.authoring_justice,
            edit.effective_type_flag.map(encode_flag),
            edit.no_concurrences_flag.map(encode_flag),
            id,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }

        let stored = read_concurrences(&tx, id)?;
        let diff = MembershipDiff::between(&stored, &edit.concurring_justices);
        apply_membership_diff(&tx, id, &diff)?;

        let raw = read_opinion(&tx, id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    let opinion = raw.map(RawOpinion::into_opinion);
    if opinion.is_some() {
      tracing::debug!(opinion_id = id, "updated opinion");
    }
    Ok(opinion)
  }

  // ── Agreement chart ───────────────────────────────────────────────────────

  async fn list_chart_cases(&self) -> Result<Vec<ChartCase>> {
    let cases = self
      .conn
      .call(|conn| Ok(read_chart_cases(conn)?))
      .await?;
    tracing::debug!(cases = cases.len(), "read agreement chart cases");
    Ok(cases)
  }
}
