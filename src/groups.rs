//! Growth group stage: split same-plant observations into reference groups
//! strictly healthier and strictly less healthy than the subject.

use anyhow::Result;
use colored::*;

use crate::growth::{self, GrowthLevel};
use crate::record::GroupResult;
use crate::store::VectorStore;

/// Partition same-plant records around the subject's growth level.
///
/// `positive` holds records ranked above the subject, `negative` those ranked
/// below, each bounded by `top_k`; equal ranks land in neither group. An
/// unresolved subject label ranks below every level, so everything resolvable
/// lands in `positive`.
pub fn search_growth_groups(
  store: &dyn VectorStore,
  plant_name: &str,
  user_growth_level: &str,
  top_k: usize,
) -> Result<GroupResult> {
  let user_rank = growth::rank(user_growth_level);

  let higher: Vec<GrowthLevel> =
    GrowthLevel::ALL.into_iter().filter(|level| level.rank() > user_rank).collect();
  let lower: Vec<GrowthLevel> =
    GrowthLevel::ALL.into_iter().filter(|level| level.rank() < user_rank).collect();

  let positive =
    if higher.is_empty() { vec![] } else { store.query_levels(plant_name, &higher, top_k)? };
  let negative =
    if lower.is_empty() { vec![] } else { store.query_levels(plant_name, &lower, top_k)? };

  println!(
    "Growth groups for {} at '{}': {} healthier / {} weaker",
    plant_name.blue().bold(),
    user_growth_level,
    positive.len().to_string().green(),
    negative.len().to_string().red()
  );

  Ok(GroupResult { positive, negative })
}
