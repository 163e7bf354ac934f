//! Similarity search stage: find prior observations of the same plant whose
//! symptom descriptions read most like the subject's.

use anyhow::Result;
use colored::*;
use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::record::SimilaritySample;
use crate::store::{DistanceMetric, StoreContractError, VectorStore};

/// Cosine distance is bounded to [0, 2]; anything outside means the store is
/// running a different metric and `1 - distance` would be meaningless.
const MAX_COSINE_DISTANCE: f32 = 2.0;

/// Retrieve the `top_k` same-plant observations most similar to `query_text`,
/// ordered by descending similarity.
///
/// An empty result is insufficient data, not a failure; metric or distance
/// contract violations are.
pub fn search_similar_symptoms(
  embedder: &dyn EmbeddingProvider,
  store: &dyn VectorStore,
  query_text: &str,
  plant_name: &str,
  top_k: usize,
) -> Result<Vec<SimilaritySample>> {
  if store.metric() != DistanceMetric::Cosine {
    return Err(StoreContractError::MetricMismatch(store.metric()).into());
  }

  let query_vector = embedder.embed(query_text)?;
  debug!(dim = query_vector.len(), "query text embedded");

  let hits = store.search_text(&query_vector, plant_name, top_k)?;
  if hits.is_empty() {
    println!("{}", "No similar observations found".yellow());
    return Ok(vec![]);
  }

  println!("Top-{} similar symptoms for {}", hits.len(), plant_name.blue().bold());

  let mut samples = Vec::with_capacity(hits.len());
  for (i, hit) in hits.iter().enumerate() {
    let sim = similarity_from_distance(hit.distance, &hit.image_name)?;
    println!(
      "{:>2}. [{}] sim={:.3} | {}",
      i + 1,
      hit.growth_level.green(),
      sim,
      hit.image_name
    );
    samples.push(SimilaritySample {
      growth_level: hit.growth_level.clone(),
      sensor_vector: hit.sensor_vector.clone(),
    });
  }

  Ok(samples)
}

/// Convert a store-reported cosine distance into a similarity score.
fn similarity_from_distance(distance: f32, image_name: &str) -> Result<f32, StoreContractError> {
  if !(0.0..=MAX_COSINE_DISTANCE).contains(&distance) {
    return Err(StoreContractError::DistanceOutOfRange {
      distance,
      image_name: image_name.to_string(),
    });
  }
  Ok(1.0 - distance)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn distance_converts_to_similarity() {
    assert_eq!(similarity_from_distance(0.0, "img").unwrap(), 1.0);
    assert_eq!(similarity_from_distance(1.0, "img").unwrap(), 0.0);
    assert_eq!(similarity_from_distance(2.0, "img").unwrap(), -1.0);
  }

  #[test]
  fn out_of_range_distance_is_a_contract_violation() {
    assert!(similarity_from_distance(-0.5, "img").is_err());
    assert!(similarity_from_distance(2.5, "img").is_err());
  }
}
