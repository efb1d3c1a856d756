//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use scoca_core::{
  model::{CaseFiling, CaseFilingFlags, Justice, NewOpinion, OpinionEdit, OpinionTypeId},
  normalize::{OpinionSubmission, normalize_edit, normalize_new},
  reconcile::membership,
  store::{Listing, OpinionStore},
};

use crate::SqliteStore;

const JUSTICES: [(&str, &str); 4] = [
  ("RG", "Ruth Greene"),
  ("SB", "Samuel Brooks"),
  ("EK", "Elena Kovac"),
  ("MC", "Maria Castro"),
];

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  for (shorthand, fullname) in JUSTICES {
    s.add_justice(Justice {
      shorthand: shorthand.into(),
      fullname:  fullname.into(),
    })
    .await
    .unwrap();
  }
  s
}

fn filing(docket_number: &str, filed_on: (i32, u32, u32)) -> CaseFiling {
  CaseFiling {
    docket_number:       docket_number.into(),
    url:                 Some(format!("https://example.org/{docket_number}")),
    sha1:                Some("da39a3ee5e6b4b0d3255bfef95601890afd80709".into()),
    filed_on:            NaiveDate::from_ymd_opt(filed_on.0, filed_on.1, filed_on.2),
    added_on:            None,
    exclude_from_chart:  false,
    ends_in_letter_flag: false,
    no_opinions_flag:    false,
  }
}

fn new_opinion(docket_number: &str, author: &str, concurring: &[&str]) -> NewOpinion {
  NewOpinion {
    docket_number:        docket_number.into(),
    type_id:              OpinionTypeId::MAJORITY,
    effective_type_id:    None,
    authoring_justice:    author.into(),
    effective_type_flag:  false,
    no_concurrences_flag: false,
    concurring_justices:  membership(concurring.iter().copied()),
  }
}

fn edit(type_id: OpinionTypeId, author: &str, concurring: &[&str]) -> OpinionEdit {
  OpinionEdit {
    type_id,
    effective_type_id: None,
    authoring_justice: author.into(),
    effective_type_flag: None,
    no_concurrences_flag: None,
    concurring_justices: membership(concurring.iter().copied()),
  }
}

/// Rows written by INSERT, UPDATE and DELETE since the connection opened.
async fn total_changes(s: &SqliteStore) -> i64 {
  s.conn
    .call(|conn| Ok(conn.query_row("SELECT total_changes()", [], |row| row.get(0))?))
    .await
    .unwrap()
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn opinion_types_are_seeded() {
  let s = store().await;
  let types = s.list_opinion_types().await.unwrap();
  assert_eq!(types.len(), 4);
  assert_eq!(types[3].id, OpinionTypeId::CONCURRING_AND_DISSENTING);
  assert_eq!(types[3].label, "concurring and dissenting");
}

#[tokio::test]
async fn add_justice_is_idempotent() {
  let s = store().await;
  let again = s
    .add_justice(Justice {
      shorthand: "RG".into(),
      fullname:  "Someone Else".into(),
    })
    .await
    .unwrap();
  assert!(!again);

  let justices = s.list_justices().await.unwrap();
  assert_eq!(justices.len(), JUSTICES.len());
  let rg = justices.iter().find(|j| j.shorthand == "RG").unwrap();
  assert_eq!(rg.fullname, "Ruth Greene");
}

// ─── Case filings ────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_case_filing_missing_returns_none() {
  let s = store().await;
  assert!(s.get_case_filing("S000000").await.unwrap().is_none());
}

#[tokio::test]
async fn case_filing_roundtrip_with_opinions() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();
  let created = s
    .create_opinion(new_opinion("S250000", "RG", &["SB"]))
    .await
    .unwrap();

  let detail = s.get_case_filing("S250000").await.unwrap().unwrap();
  assert_eq!(detail.filing.filed_on, NaiveDate::from_ymd_opt(2019, 6, 27));
  assert!(detail.filing.added_on.is_some(), "added_on defaults to now");
  assert_eq!(detail.opinions.len(), 1);
  assert_eq!(detail.opinions[0], created.record);
}

#[tokio::test]
async fn update_case_filing_flags_sets_all_three() {
  let s = store().await;
  s.add_case_filing(filing("S250001M", (2019, 7, 1))).await.unwrap();

  let flags = CaseFilingFlags {
    exclude_from_chart:  true,
    ends_in_letter_flag: true,
    no_opinions_flag:    false,
  };
  let detail = s
    .update_case_filing_flags("S250001M", flags)
    .await
    .unwrap()
    .unwrap();
  assert!(detail.filing.exclude_from_chart);
  assert!(detail.filing.ends_in_letter_flag);
  assert!(!detail.filing.no_opinions_flag);
}

#[tokio::test]
async fn update_case_filing_flags_missing_returns_none() {
  let s = store().await;
  let flags = CaseFilingFlags {
    exclude_from_chart:  false,
    ends_in_letter_flag: false,
    no_opinions_flag:    false,
  };
  assert!(
    s.update_case_filing_flags("S404", flags)
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn flagged_case_filings_in_review_order() {
  let s = store().await;

  let mut plain = filing("S100000", (2019, 1, 10));
  plain.no_opinions_flag = true;
  let mut lettered = filing("S100000M", (2019, 1, 5));
  lettered.no_opinions_flag = true;
  lettered.ends_in_letter_flag = true;
  let mut appended = filing("S100001A", (2019, 1, 1));
  appended.ends_in_letter_flag = true;
  let unflagged = filing("S100002", (2019, 2, 1));

  for f in [appended, unflagged, lettered, plain] {
    s.add_case_filing(f).await.unwrap();
  }

  let flagged = s.list_case_filings(Listing::Flagged).await.unwrap();
  let dockets: Vec<&str> =
    flagged.iter().map(|f| f.docket_number.as_str()).collect();
  assert_eq!(dockets, ["S100000", "S100000M", "S100001A"]);

  let all = s.list_case_filings(Listing::All).await.unwrap();
  assert_eq!(all.len(), 4);
  assert_eq!(all[0].docket_number, "S100002", "newest filing first");
}

// ─── Opinion creation ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_opinion_stores_concurrences() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();

  let submission = OpinionSubmission {
    docket_number:        Some("S250000".into()),
    type_id:              Some(OpinionTypeId::MAJORITY),
    effective_type_id:    Some(OpinionTypeId::DISSENTING),
    authoring_justice:    Some("RG".into()),
    effective_type_flag:  Some(false),
    no_concurrences_flag: Some(true),
    concurring_justices:  ["RG", "SB", "EK", "SB"].map(String::from).to_vec(),
  };
  let created = s
    .create_opinion(normalize_new(submission).unwrap())
    .await
    .unwrap();

  assert_eq!(created.record.effective_type_id, None);
  assert!(created.record.no_concurrences_flag);
  assert_eq!(created.concurring_justices, membership(["EK", "SB"]));
  assert_eq!(
    created.case_filing_url.as_deref(),
    Some("https://example.org/S250000")
  );

  let fetched = s.get_opinion(created.record.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn duplicate_natural_keys_get_distinct_ids() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();

  let mut first = new_opinion("S250000", "SB", &["RG"]);
  first.type_id = OpinionTypeId::CONCURRING;
  let mut second = new_opinion("S250000", "SB", &["EK", "MC"]);
  second.type_id = OpinionTypeId::CONCURRING;

  let a = s.create_opinion(first).await.unwrap();
  let b = s.create_opinion(second).await.unwrap();

  assert_ne!(a.record.id, b.record.id);
  assert_eq!(a.concurring_justices, membership(["RG"]));
  assert_eq!(b.concurring_justices, membership(["EK", "MC"]));
}

#[tokio::test]
async fn create_opinion_with_unknown_justice_leaves_nothing_behind() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();

  let err = s
    .create_opinion(new_opinion("S250000", "RG", &["SB", "ZZ"]))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)));

  assert!(s.list_opinions(Listing::All).await.unwrap().is_empty());
}

// ─── Opinion edits ───────────────────────────────────────────────────────────

#[tokio::test]
async fn update_reconciles_concurrences() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();
  let created = s
    .create_opinion(new_opinion("S250000", "MC", &["RG", "SB"]))
    .await
    .unwrap();

  let updated = s
    .update_opinion(
      created.record.id,
      edit(OpinionTypeId::MAJORITY, "MC", &["SB", "EK"]),
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.concurring_justices, membership(["SB", "EK"]));

  let fetched = s.get_opinion(created.record.id).await.unwrap().unwrap();
  assert_eq!(fetched.concurring_justices, membership(["SB", "EK"]));
}

#[tokio::test]
async fn update_with_same_set_is_unchanged() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();
  let created = s
    .create_opinion(new_opinion("S250000", "MC", &["RG", "SB"]))
    .await
    .unwrap();

  let before = total_changes(&s).await;
  let updated = s
    .update_opinion(
      created.record.id,
      edit(OpinionTypeId::MAJORITY, "MC", &["SB", "RG"]),
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated, created);
  // Only the opinion row itself is rewritten; concurrences are untouched.
  assert_eq!(total_changes(&s).await - before, 1);

  let before = total_changes(&s).await;
  s.update_opinion(
    created.record.id,
    edit(OpinionTypeId::MAJORITY, "MC", &["SB", "EK"]),
  )
  .await
  .unwrap()
  .unwrap();
  // Opinion row, one delete (RG), one insert (EK).
  assert_eq!(total_changes(&s).await - before, 3);
}

#[tokio::test]
async fn changing_type_clears_effective_type() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();

  let mut input = new_opinion("S250000", "EK", &[]);
  input.type_id = OpinionTypeId::CONCURRING_AND_DISSENTING;
  input.effective_type_id = Some(OpinionTypeId::DISSENTING);
  let created = s.create_opinion(input).await.unwrap();
  assert_eq!(
    created.record.effective_type_id,
    Some(OpinionTypeId::DISSENTING)
  );

  let submission = OpinionSubmission {
    type_id: Some(OpinionTypeId::DISSENTING),
    effective_type_id: Some(OpinionTypeId::DISSENTING),
    authoring_justice: Some("EK".into()),
    ..Default::default()
  };
  let updated = s
    .update_opinion(created.record.id, normalize_edit(submission).unwrap())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.record.type_id, OpinionTypeId::DISSENTING);
  assert_eq!(updated.record.effective_type_id, None);
}

#[tokio::test]
async fn omitted_flags_keep_stored_values() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();

  let mut input = new_opinion("S250000", "RG", &[]);
  input.effective_type_flag = true;
  input.no_concurrences_flag = true;
  let created = s.create_opinion(input).await.unwrap();

  let mut clear_one = edit(OpinionTypeId::MAJORITY, "RG", &[]);
  clear_one.no_concurrences_flag = Some(false);
  let updated = s
    .update_opinion(created.record.id, clear_one)
    .await
    .unwrap()
    .unwrap();

  assert!(updated.record.effective_type_flag, "omitted flag kept");
  assert!(!updated.record.no_concurrences_flag, "submitted flag cleared");
}

#[tokio::test]
async fn new_author_is_removed_from_concurrences() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();
  let created = s
    .create_opinion(new_opinion("S250000", "MC", &["RG", "SB"]))
    .await
    .unwrap();

  // RG becomes the author while still selected as concurring.
  let submission = OpinionSubmission {
    type_id: Some(OpinionTypeId::MAJORITY),
    authoring_justice: Some("RG".into()),
    concurring_justices: ["RG", "SB", "MC"].map(String::from).to_vec(),
    ..Default::default()
  };
  let updated = s
    .update_opinion(created.record.id, normalize_edit(submission).unwrap())
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.record.authoring_justice, "RG");
  assert_eq!(updated.concurring_justices, membership(["MC", "SB"]));
}

#[tokio::test]
async fn update_missing_opinion_returns_none() {
  let s = store().await;
  let result = s
    .update_opinion(9999, edit(OpinionTypeId::MAJORITY, "RG", &[]))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn failed_insert_rolls_back_deletes_and_row_update() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();
  let created = s
    .create_opinion(new_opinion("S250000", "MC", &["RG", "SB"]))
    .await
    .unwrap();

  // Drops RG (delete succeeds) then adds ZZ, which is not a justice.
  let bad = edit(OpinionTypeId::DISSENTING, "MC", &["SB", "ZZ"]);
  let err = s.update_opinion(created.record.id, bad).await.unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)));

  let after = s.get_opinion(created.record.id).await.unwrap().unwrap();
  assert_eq!(after, created);
  assert_eq!(after.concurring_justices, membership(["RG", "SB"]));
  assert_eq!(after.record.type_id, OpinionTypeId::MAJORITY);
}

// ─── Listings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn flagged_opinions_put_effective_type_first() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();

  let mut no_conc = new_opinion("S250000", "RG", &[]);
  no_conc.no_concurrences_flag = true;
  let mut eff = new_opinion("S250000", "SB", &[]);
  eff.type_id = OpinionTypeId::CONCURRING_AND_DISSENTING;
  eff.effective_type_id = Some(OpinionTypeId::CONCURRING);
  eff.effective_type_flag = true;
  let clean = new_opinion("S250000", "EK", &["MC"]);

  let no_conc = s.create_opinion(no_conc).await.unwrap();
  let eff = s.create_opinion(eff).await.unwrap();
  s.create_opinion(clean).await.unwrap();

  let flagged = s.list_opinions(Listing::Flagged).await.unwrap();
  let ids: Vec<i64> = flagged.iter().map(|o| o.id).collect();
  assert_eq!(ids, [eff.record.id, no_conc.record.id]);

  let all = s.list_opinions(Listing::All).await.unwrap();
  assert_eq!(all.len(), 3);
  assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}

// ─── Agreement chart ─────────────────────────────────────────────────────────

#[tokio::test]
async fn chart_cases_group_secondaries_and_skip_excluded_filings() {
  let s = store().await;
  s.add_case_filing(filing("S250000", (2019, 6, 27))).await.unwrap();
  let mut excluded = filing("S260000", (2019, 7, 1));
  excluded.exclude_from_chart = true;
  s.add_case_filing(excluded).await.unwrap();

  let majority = s
    .create_opinion(new_opinion("S250000", "RG", &["SB"]))
    .await
    .unwrap();
  let mut dissent = new_opinion("S250000", "MC", &[]);
  dissent.type_id = OpinionTypeId::DISSENTING;
  let dissent = s.create_opinion(dissent).await.unwrap();
  let mut concurrence = new_opinion("S250000", "EK", &["SB"]);
  concurrence.type_id = OpinionTypeId::CONCURRING;
  let concurrence = s.create_opinion(concurrence).await.unwrap();
  s.create_opinion(new_opinion("S260000", "EK", &["MC"]))
    .await
    .unwrap();

  let cases = s.list_chart_cases().await.unwrap();
  assert_eq!(cases.len(), 1);
  let case = &cases[0];
  assert_eq!(case.docket_number, "S250000");
  assert_eq!(case.majority.id, majority.record.id);
  assert_eq!(case.majority.concurring_justices, membership(["SB"]));
  // Ordered by type: concurring (2) before dissenting (3).
  let secondary: Vec<i64> = case.secondary.iter().map(|o| o.id).collect();
  assert_eq!(secondary, [concurrence.record.id, dissent.record.id]);
  assert_eq!(case.secondary[0].concurring_justices, membership(["SB"]));

  let included = CaseFilingFlags {
    exclude_from_chart:  false,
    ends_in_letter_flag: false,
    no_opinions_flag:    false,
  };
  s.update_case_filing_flags("S260000", included)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(s.list_chart_cases().await.unwrap().len(), 2);
}
