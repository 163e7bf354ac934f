//! Orchestrator: run the three diagnostic stages in sequence.

use anyhow::Result;
use colored::*;

use crate::compare;
use crate::embedding::EmbeddingProvider;
use crate::groups;
use crate::record::{AdviceItem, GroupResult, SimilaritySample};
use crate::search;
use crate::store::VectorStore;

/// Full pipeline output, kept around for report generation.
#[derive(Debug, Clone)]
pub struct Analysis {
  pub similar: Vec<SimilaritySample>,
  pub groups: GroupResult,
  pub advice: Vec<AdviceItem>,
}

/// Run similarity search, group partitioning, and environment comparison for
/// one observation. Pure sequencing; each stage owns its own logic.
pub fn run_analysis(
  embedder: &dyn EmbeddingProvider,
  store: &dyn VectorStore,
  query_text: &str,
  plant_name: &str,
  user_growth_level: &str,
  top_k: usize,
) -> Result<Analysis> {
  println!("\n{}", "Step 1: searching similar symptoms".bold());
  let similar = search::search_similar_symptoms(embedder, store, query_text, plant_name, top_k)?;

  println!("\n{}", "Step 2: collecting growth reference groups".bold());
  let groups = groups::search_growth_groups(store, plant_name, user_growth_level, top_k)?;

  println!("\n{}", "Step 3: comparing environments".bold());
  let advice = compare::compare_environment(&similar, &groups);

  if advice.is_empty() {
    println!("\n{}", "No adjustments suggested".green());
  } else {
    println!("\n{}", "Suggested adjustments:".bold());
    for (i, item) in advice.iter().enumerate() {
      println!("{}. {}: {}", i + 1, item.field.cyan(), item.message);
    }
  }

  Ok(Analysis { similar, groups, advice })
}

/// Analyze one plant observation and return the advice list.
pub fn analyze_plant_condition(
  embedder: &dyn EmbeddingProvider,
  store: &dyn VectorStore,
  query_text: &str,
  plant_name: &str,
  user_growth_level: &str,
  top_k: usize,
) -> Result<Vec<AdviceItem>> {
  let analysis =
    run_analysis(embedder, store, query_text, plant_name, user_growth_level, top_k)?;
  Ok(analysis.advice)
}
