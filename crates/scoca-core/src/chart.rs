//! The agreement chart: for each pair of justices, how often they sided
//! together across the majority opinions in the dataset.
//!
//! Each case contributes one "side" relation per justice. A majority author
//! concurs with everyone who joined the majority and with every author or
//! joiner of a concurring secondary opinion; they dissent from every author
//! or joiner of a dissenting one. A secondary author concurs with the
//! justices who joined them. A pair's rate is agreements over agreements
//! plus dissents.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Justice, OpinionTypeId};

/// An opinion as the chart reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOpinion {
  pub id:                  i64,
  pub type_id:             OpinionTypeId,
  pub effective_type_id:   Option<OpinionTypeId>,
  pub authoring_justice:   String,
  pub concurring_justices: BTreeSet<String>,
}

impl ChartOpinion {
  /// The side a secondary opinion takes against the majority: its effective
  /// type for concurring-and-dissenting opinions, otherwise its own type.
  ///
  /// Returns `None` when that is neither concurring nor dissenting.
  pub fn direction(&self) -> Option<OpinionTypeId> {
    let direction = if self.type_id.takes_effective_type() {
      self.effective_type_id?
    } else {
      self.type_id
    };
    [OpinionTypeId::CONCURRING, OpinionTypeId::DISSENTING]
      .contains(&direction)
      .then_some(direction)
  }
}

/// One case: a majority opinion and the other opinions under the same
/// docket number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartCase {
  pub docket_number: String,
  pub majority:      ChartOpinion,
  pub secondary:     Vec<ChartOpinion>,
}

/// How often a pair agreed, out of how often they met at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairCounts {
  pub agreed: u32,
  pub total:  u32,
}

impl PairCounts {
  /// Agreement as a percentage, or `None` if the pair never met.
  pub fn rate(self) -> Option<f64> {
    (self.total > 0).then(|| f64::from(self.agreed) * 100.0 / f64::from(self.total))
  }

  /// [`rate`](Self::rate) rounded to a whole percent.
  pub fn percent(self) -> Option<u32> {
    self.rate().map(|r| r.round() as u32)
  }
}

/// Pair counts for every pair in a roster of justices.
#[derive(Debug, Clone, PartialEq)]
pub struct AgreementChart {
  /// The roster, in the order rows and columns are drawn.
  pub justices: Vec<Justice>,
  /// Secondary opinions left out because their direction is unknown.
  pub skipped:  Vec<i64>,
  counts:       BTreeMap<(String, String), PairCounts>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
  if a <= b {
    (a.to_owned(), b.to_owned())
  } else {
    (b.to_owned(), a.to_owned())
  }
}

impl AgreementChart {
  /// Tally `cases` for every pair of `justices`.
  ///
  /// Justices outside the roster are ignored, as is any justice paired with
  /// themself.
  pub fn build(justices: Vec<Justice>, cases: &[ChartCase]) -> Self {
    let mut counts = BTreeMap::new();
    for (i, j1) in justices.iter().enumerate() {
      for j2 in &justices[i + 1..] {
        counts.insert(pair_key(&j1.shorthand, &j2.shorthand), PairCounts::default());
      }
    }

    let mut skipped = Vec::new();
    for case in cases {
      let mut concurs: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
      let mut dissents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

      let majority_author = case.majority.authoring_justice.as_str();
      concurs
        .entry(majority_author)
        .or_default()
        .extend(case.majority.concurring_justices.iter().map(String::as_str));

      for opinion in &case.secondary {
        let Some(direction) = opinion.direction() else {
          skipped.push(opinion.id);
          continue;
        };
        let author = opinion.authoring_justice.as_str();
        let joined = opinion.concurring_justices.iter().map(String::as_str);
        concurs.entry(author).or_default().extend(joined.clone());

        let side = if direction == OpinionTypeId::CONCURRING {
          &mut concurs
        } else {
          &mut dissents
        };
        side
          .entry(majority_author)
          .or_default()
          .extend(joined.chain([author]));
      }

      for (j1, others) in &concurs {
        for j2 in others.iter().filter(|j2| *j2 != j1) {
          if let Some(c) = counts.get_mut(&pair_key(j1, j2)) {
            c.agreed += 1;
            c.total += 1;
          }
        }
      }
      for (j1, others) in &dissents {
        for j2 in others.iter().filter(|j2| *j2 != j1) {
          if let Some(c) = counts.get_mut(&pair_key(j1, j2)) {
            c.total += 1;
          }
        }
      }
    }

    Self { justices, skipped, counts }
  }

  /// Counts for a pair, in either order. Unknown pairs are all zero.
  pub fn counts(&self, a: &str, b: &str) -> PairCounts {
    self.counts.get(&pair_key(a, b)).copied().unwrap_or_default()
  }

  /// Every roster pair with its counts.
  pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, PairCounts)> {
    self
      .counts
      .iter()
      .map(|((a, b), c)| (a.as_str(), b.as_str(), *c))
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;
  use crate::reconcile::membership;

  fn roster(shorthands: &[&str]) -> Vec<Justice> {
    shorthands
      .iter()
      .map(|s| Justice {
        shorthand: (*s).into(),
        fullname:  format!("Justice {s}"),
      })
      .collect()
  }

  fn opinion(
    id: i64,
    type_id: OpinionTypeId,
    author: &str,
    joined: &[&str],
  ) -> ChartOpinion {
    ChartOpinion {
      id,
      type_id,
      effective_type_id: None,
      authoring_justice: author.into(),
      concurring_justices: membership(joined.iter().copied()),
    }
  }

  fn case(majority: ChartOpinion, secondary: Vec<ChartOpinion>) -> ChartCase {
    ChartCase {
      docket_number: "S250000".into(),
      majority,
      secondary,
    }
  }

  #[test]
  fn majority_joiners_agree_and_dissenters_do_not() {
    let cases = [case(
      opinion(1, OpinionTypeId::MAJORITY, "RG", &["SB"]),
      vec![opinion(2, OpinionTypeId::DISSENTING, "EK", &["MC"])],
    )];
    let chart = AgreementChart::build(roster(&["RG", "SB", "EK", "MC"]), &cases);

    assert_eq!(chart.counts("RG", "SB"), PairCounts { agreed: 1, total: 1 });
    assert_eq!(chart.counts("RG", "EK"), PairCounts { agreed: 0, total: 1 });
    assert_eq!(chart.counts("MC", "RG"), PairCounts { agreed: 0, total: 1 });
    assert_eq!(chart.counts("EK", "MC"), PairCounts { agreed: 1, total: 1 });
    // SB only met the others through RG's opinion.
    assert_eq!(chart.counts("SB", "EK").rate(), None);
    assert!(chart.skipped.is_empty());
  }

  #[test]
  fn concurring_opinion_sides_with_majority() {
    let cases = [case(
      opinion(1, OpinionTypeId::MAJORITY, "RG", &[]),
      vec![opinion(2, OpinionTypeId::CONCURRING, "SB", &["EK"])],
    )];
    let chart = AgreementChart::build(roster(&["RG", "SB", "EK"]), &cases);
    assert_eq!(chart.counts("RG", "SB").percent(), Some(100));
    assert_eq!(chart.counts("RG", "EK").percent(), Some(100));
    assert_eq!(chart.counts("SB", "EK").percent(), Some(100));
  }

  #[test]
  fn concurring_and_dissenting_follows_effective_type() {
    let mut dissent = opinion(2, OpinionTypeId::CONCURRING_AND_DISSENTING, "SB", &[]);
    dissent.effective_type_id = Some(OpinionTypeId::DISSENTING);
    let unset = opinion(3, OpinionTypeId::CONCURRING_AND_DISSENTING, "EK", &[]);

    let cases = [case(
      opinion(1, OpinionTypeId::MAJORITY, "RG", &[]),
      vec![dissent, unset],
    )];
    let chart = AgreementChart::build(roster(&["RG", "SB", "EK"]), &cases);
    assert_eq!(chart.counts("RG", "SB"), PairCounts { agreed: 0, total: 1 });
    assert_eq!(chart.counts("RG", "EK"), PairCounts::default());
    assert_eq!(chart.skipped, vec![3]);
  }

  #[test]
  fn justices_off_the_roster_are_ignored() {
    let cases = [case(
      opinion(1, OpinionTypeId::MAJORITY, "XX", &["RG", "SB"]),
      vec![],
    )];
    let chart = AgreementChart::build(roster(&["RG", "SB"]), &cases);
    assert_eq!(chart.counts("RG", "SB"), PairCounts::default());
    assert_eq!(chart.pairs().count(), 1);
  }

  #[test]
  fn percent_rounds() {
    assert_eq!(PairCounts { agreed: 2, total: 3 }.percent(), Some(67));
    assert_eq!(PairCounts { agreed: 1, total: 8 }.percent(), Some(13));
    assert_eq!(PairCounts::default().percent(), None);
  }

  const POOL: [&str; 5] = ["RG", "SB", "EK", "MC", "XX"];

  fn chart_opinion(types: Vec<i64>) -> impl Strategy<Value = ChartOpinion> {
    (
      any::<i64>(),
      prop::sample::select(types),
      prop::option::of(prop::sample::select(vec![1i64, 2, 3, 4])),
      prop::sample::select(POOL.to_vec()),
      prop::collection::btree_set(
        prop::sample::select(POOL.to_vec()).prop_map(String::from),
        0..5,
      ),
    )
      .prop_map(|(id, type_id, effective, author, joined)| ChartOpinion {
        id,
        type_id: OpinionTypeId(type_id),
        effective_type_id: effective.map(OpinionTypeId),
        authoring_justice: author.into(),
        concurring_justices: joined,
      })
  }

  fn chart_cases(secondary_types: Vec<i64>) -> impl Strategy<Value = Vec<ChartCase>> {
    prop::collection::vec(
      (
        chart_opinion(vec![1]),
        prop::collection::vec(chart_opinion(secondary_types), 0..4),
      )
        .prop_map(|(majority, secondary)| case(majority, secondary)),
      0..6,
    )
  }

  proptest! {
    #[test]
    fn rates_are_well_formed(cases in chart_cases(vec![2, 3, 4])) {
      let chart = AgreementChart::build(roster(&POOL[..4]), &cases);
      prop_assert_eq!(chart.pairs().count(), 6);
      for (a, b, c) in chart.pairs() {
        prop_assert!(c.agreed <= c.total);
        prop_assert_eq!(chart.counts(b, a), c);
        if let Some(rate) = c.rate() {
          prop_assert!((0.0..=100.0).contains(&rate));
        }
      }
    }

    #[test]
    fn without_dissents_every_pair_agrees(cases in chart_cases(vec![2])) {
      let chart = AgreementChart::build(roster(&POOL[..4]), &cases);
      for (_, _, c) in chart.pairs() {
        prop_assert_eq!(c.agreed, c.total);
      }
      prop_assert!(chart.skipped.is_empty());
    }
  }
}
