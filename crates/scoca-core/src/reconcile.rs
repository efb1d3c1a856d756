//! Concurring-justice membership reconciliation.
//!
//! Converts "the justices currently stored for an opinion" and "the justices
//! the edit form just submitted" into the minimal set of row deletions and
//! insertions. Storage backends apply the result inside the same transaction
//! that updates the opinion row.

use std::collections::BTreeSet;

/// Collect justice shorthands into a membership set. Duplicates collapse.
pub fn membership<I, S>(justices: I) -> BTreeSet<String>
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  justices.into_iter().map(Into::into).collect()
}

/// The operations that move a stored membership set to a desired one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
  /// Stored but no longer wanted. Applied first.
  pub to_delete: BTreeSet<String>,
  /// Wanted but not yet stored.
  pub to_insert: BTreeSet<String>,
}

impl MembershipDiff {
  /// Diff `old` (stored) against `new` (desired).
  ///
  /// Equal sets yield an empty diff without walking either side.
  pub fn between(old: &BTreeSet<String>, new: &BTreeSet<String>) -> Self {
    if old == new {
      return Self::default();
    }
    Self {
      to_delete: old.difference(new).cloned().collect(),
      to_insert: new.difference(old).cloned().collect(),
    }
  }

  /// Diff for a brand new opinion: everything in `new` is inserted.
  pub fn from_empty(new: &BTreeSet<String>) -> Self {
    Self::between(&BTreeSet::new(), new)
  }

  /// True if applying this diff would touch no rows.
  pub fn is_noop(&self) -> bool {
    self.to_delete.is_empty() && self.to_insert.is_empty()
  }

  /// The membership that results from applying this diff to `old`.
  pub fn apply_to(&self, old: &BTreeSet<String>) -> BTreeSet<String> {
    old
      .difference(&self.to_delete)
      .chain(self.to_insert.iter())
      .cloned()
      .collect()
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;

  #[test]
  fn swap_one_justice() {
    let old = membership(["RG", "SB"]);
    let new = membership(["SB", "EK"]);
    let diff = MembershipDiff::between(&old, &new);

    assert_eq!(diff.to_delete, membership(["RG"]));
    assert_eq!(diff.to_insert, membership(["EK"]));
    assert_eq!(diff.apply_to(&old), new);
  }

  #[test]
  fn equal_sets_are_noop() {
    let old = membership(["RG", "SB"]);
    let new = membership(["SB", "RG", "SB"]);
    let diff = MembershipDiff::between(&old, &new);
    assert!(diff.is_noop());
  }

  #[test]
  fn from_empty_inserts_everything() {
    let new = membership(["SB", "EK"]);
    let diff = MembershipDiff::from_empty(&new);
    assert!(diff.to_delete.is_empty());
    assert_eq!(diff.to_insert, new);
  }

  #[test]
  fn clearing_deletes_everything() {
    let old = membership(["SB", "EK"]);
    let diff = MembershipDiff::between(&old, &BTreeSet::new());
    assert_eq!(diff.to_delete, old);
    assert!(diff.to_insert.is_empty());
  }

  fn justice_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(
      prop::sample::select(vec!["RG", "SB", "EK", "MC", "LK", "JG", "CC", "GL"])
        .prop_map(String::from),
      0..8,
    )
  }

  proptest! {
    #[test]
    fn diff_is_exact_set_difference(a in justice_set(), b in justice_set()) {
      let diff = MembershipDiff::between(&a, &b);
      let expected_delete: BTreeSet<String> = a.difference(&b).cloned().collect();
      let expected_insert: BTreeSet<String> = b.difference(&a).cloned().collect();
      prop_assert_eq!(&diff.to_delete, &expected_delete);
      prop_assert_eq!(&diff.to_insert, &expected_insert);
      prop_assert_eq!(diff.apply_to(&a), b);
    }

    #[test]
    fn self_diff_is_noop(a in justice_set()) {
      prop_assert!(MembershipDiff::between(&a, &a).is_noop());
    }
  }
}
