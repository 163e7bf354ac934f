//! Vector store session and the file-backed reference implementation.
//!
//! Stages receive the store as an explicit session object so they can run
//! against a mock in tests instead of a shared global connection.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::growth::GrowthLevel;
use crate::record::{self, SampleRecord, SimilaritySample};
use crate::similarity;

/// Distance metric a store's text-vector index reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
  Cosine,
  InnerProduct,
  Euclidean,
}

/// Contract violations from the store collaborator. These fail loudly:
/// a silently swapped metric would corrupt every similarity score.
#[derive(Debug, Error)]
pub enum StoreContractError {
  #[error("store reports {0:?} metric; similarity conversion requires cosine distance")]
  MetricMismatch(DistanceMetric),
  #[error("distance {distance} for hit '{image_name}' is outside the cosine range [0, 2]")]
  DistanceOutOfRange { distance: f32, image_name: String },
}

/// One ranked hit from a text-vector search, ordered by ascending distance.
#[derive(Debug, Clone)]
pub struct SearchHit {
  pub distance: f32,
  pub growth_level: String,
  pub sensor_vector: Vec<f32>,
  pub image_name: String,
}

/// Session handle to the record store.
pub trait VectorStore {
  /// Metric of the text-vector index; validated by the similarity stage.
  fn metric(&self) -> DistanceMetric;

  /// Nearest-neighbor search over text embeddings, restricted to records of
  /// one plant, bounded by `limit`.
  fn search_text(&self, query_vector: &[f32], plant_name: &str, limit: usize)
    -> Result<Vec<SearchHit>>;

  /// Metadata-filtered scan: records of one plant whose growth level resolves
  /// to one of `levels`, bounded by `limit`.
  fn query_levels(&self, plant_name: &str, levels: &[GrowthLevel], limit: usize)
    -> Result<Vec<SimilaritySample>>;
}

/// File-backed store reading the records the ingestion collaborator wrote
/// under `<root>/<plant_name>/<image_name>.record.json`.
///
/// Ordering is deterministic for a fixed set of files: searches break
/// distance ties by image name, scans are ordered by image name.
pub struct FileStore {
  root: PathBuf,
}

impl FileStore {
  /// Open the store at the configured records root.
  pub fn open() -> Result<Self> {
    Ok(Self { root: record::get_records_root()? })
  }

  pub fn with_root(root: PathBuf) -> Self {
    Self { root }
  }

  /// All records for one plant, ordered by image name. A missing plant
  /// directory is "no data", not a failure.
  fn plant_records(&self, plant_name: &str) -> Result<Vec<SampleRecord>> {
    let plant_dir = self.root.join(plant_name);
    if !plant_dir.exists() {
      return Ok(vec![]);
    }

    let mut records = Vec::new();
    for entry in fs::read_dir(&plant_dir)? {
      let entry = entry?;
      let path = entry.path();
      if record::is_record_file(&path) {
        records.push(record::load_from_path(&path)?);
      }
    }

    records.sort_by(|a, b| a.image_name.cmp(&b.image_name));
    Ok(records)
  }
}

impl VectorStore for FileStore {
  fn metric(&self) -> DistanceMetric {
    DistanceMetric::Cosine
  }

  fn search_text(
    &self,
    query_vector: &[f32],
    plant_name: &str,
    limit: usize,
  ) -> Result<Vec<SearchHit>> {
    let records = self.plant_records(plant_name)?;
    debug!(plant = plant_name, candidates = records.len(), "scoring text vectors");

    let mut hits: Vec<SearchHit> = records
      .into_iter()
      .map(|r| SearchHit {
        distance: similarity::cosine_distance(query_vector, &r.text_vector),
        growth_level: r.growth_level,
        sensor_vector: r.sensor_vector,
        image_name: r.image_name,
      })
      .collect();

    hits.sort_by(|a, b| {
      a.distance
        .partial_cmp(&b.distance)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| a.image_name.cmp(&b.image_name))
    });

    hits.truncate(limit);
    Ok(hits)
  }

  fn query_levels(
    &self,
    plant_name: &str,
    levels: &[GrowthLevel],
    limit: usize,
  ) -> Result<Vec<SimilaritySample>> {
    let mut samples: Vec<SimilaritySample> = self
      .plant_records(plant_name)?
      .into_iter()
      .filter(|r| {
        GrowthLevel::resolve(&r.growth_level).is_some_and(|level| levels.contains(&level))
      })
      .map(|r| SimilaritySample { growth_level: r.growth_level, sensor_vector: r.sensor_vector })
      .collect();

    samples.truncate(limit);
    Ok(samples)
  }
}
