//! Ordinal growth-level ranking.
//!
//! Growth labels come from the ingestion collaborator as free strings; this
//! module is the single place they are normalized and ordered.

/// Rank returned for any label that does not normalize to a known level.
/// A boundary value, not an error: it participates in comparisons.
pub const UNRESOLVED_RANK: i32 = -1;

/// Ordinal vigor category for a plant observation, total order DIE < Low < Medium < High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GrowthLevel {
  Die,
  Low,
  Medium,
  High,
}

impl GrowthLevel {
  pub const ALL: [GrowthLevel; 4] =
    [GrowthLevel::Die, GrowthLevel::Low, GrowthLevel::Medium, GrowthLevel::High];

  /// Integer rank used for group partitioning.
  pub fn rank(self) -> i32 {
    match self {
      GrowthLevel::Die => 0,
      GrowthLevel::Low => 1,
      GrowthLevel::Medium => 2,
      GrowthLevel::High => 3,
    }
  }

  /// The exact label the store uses for this level.
  pub fn label(self) -> &'static str {
    match self {
      GrowthLevel::Die => "DIE",
      GrowthLevel::Low => "Low",
      GrowthLevel::Medium => "Medium",
      GrowthLevel::High => "High",
    }
  }

  /// Resolve a label string to a level, tolerating case and whitespace noise.
  pub fn resolve(label: &str) -> Option<GrowthLevel> {
    match normalize(label).as_str() {
      "Die" => Some(GrowthLevel::Die),
      "Low" => Some(GrowthLevel::Low),
      "Medium" => Some(GrowthLevel::Medium),
      "High" => Some(GrowthLevel::High),
      _ => None,
    }
  }
}

/// Rank for an arbitrary label string. Pure and total: unrecognized labels
/// map to [`UNRESOLVED_RANK`] instead of failing.
pub fn rank(label: &str) -> i32 {
  GrowthLevel::resolve(label).map(GrowthLevel::rank).unwrap_or(UNRESOLVED_RANK)
}

/// Trim whitespace, capitalize the first letter, lowercase the rest.
fn normalize(label: &str) -> String {
  let trimmed = label.trim();
  let mut chars = trimmed.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_labels_resolve_to_their_rank() {
    assert_eq!(rank("DIE"), 0);
    assert_eq!(rank("Low"), 1);
    assert_eq!(rank("Medium"), 2);
    assert_eq!(rank("High"), 3);
  }

  #[test]
  fn rank_ignores_case_and_whitespace() {
    assert_eq!(rank(" low "), 1);
    assert_eq!(rank("LOW"), 1);
    assert_eq!(rank("Low"), 1);
    assert_eq!(rank("mEdIum"), 2);
    assert_eq!(rank("die"), 0);
  }

  #[test]
  fn unknown_labels_map_to_sentinel() {
    assert_eq!(rank("Thriving"), UNRESOLVED_RANK);
    assert_eq!(rank(""), UNRESOLVED_RANK);
    assert_eq!(rank("   "), UNRESOLVED_RANK);
    assert_eq!(rank("Lowish"), UNRESOLVED_RANK);
  }

  #[test]
  fn levels_are_strictly_ordered() {
    for pair in GrowthLevel::ALL.windows(2) {
      assert!(pair[0].rank() < pair[1].rank());
    }
  }

  #[test]
  fn storage_labels_round_trip() {
    for level in GrowthLevel::ALL {
      assert_eq!(GrowthLevel::resolve(level.label()), Some(level));
    }
  }
}
