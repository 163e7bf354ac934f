//! Stored observation records and the diagnostic data model.
//!
//! Records are written by the ingestion collaborator and never mutated here;
//! this core only reads them back for retrieval and comparison.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Sensor vectors always carry exactly this many readings.
pub const SENSOR_DIM: usize = 8;

/// Sensor fields in stored order. Every consumer that indexes a sensor
/// vector by position relies on this order never changing.
pub const SENSOR_FIELDS: [&str; SENSOR_DIM] = [
  "AirTemperature",
  "AirHumidity",
  "Co2",
  "Quantum",
  "HighSoilTemp",
  "HighSoilHumi",
  "LowSoilTemp",
  "LowSoilHumi",
];

/// One stored observation: a captioned plant image, its text embedding, and
/// the environmental readings taken alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
  pub image_name: String,
  pub plant_name: String,
  pub growth_level: String,
  pub place: String,
  pub text_vector: Vec<f32>,
  pub sensor_vector: Vec<f32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub captured_at: Option<DateTime<Utc>>,
}

/// Projection of a record kept after similarity search; only the growth
/// label and sensor readings travel downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilaritySample {
  pub growth_level: String,
  pub sensor_vector: Vec<f32>,
}

/// Reference observations strictly healthier (`positive`) and strictly less
/// healthy (`negative`) than the subject's stated growth level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupResult {
  pub positive: Vec<SimilaritySample>,
  pub negative: Vec<SimilaritySample>,
}

/// One recommendation tied to a single sensor field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceItem {
  pub field: String,
  pub message: String,
}

/// Get the records root directory (~/.leafsense/records)
pub fn get_records_root() -> Result<PathBuf> {
  // Allow tests or callers to override the root directory via env var
  if let Ok(custom_root) = std::env::var("LEAFSENSE_RECORDS_ROOT") {
    return Ok(PathBuf::from(custom_root));
  }

  let home = home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
  Ok(home.join(".leafsense").join("records"))
}

/// Whether a path looks like a record file (`<image_name>.record.json`).
pub fn is_record_file(path: &Path) -> bool {
  path.extension().and_then(|s| s.to_str()) == Some("json")
    && path
      .file_stem()
      .and_then(|s| s.to_str())
      .is_some_and(|stem| stem.ends_with(".record"))
}

/// Load a record from disk. Malformed files are a collaborator failure and
/// propagate unchanged.
pub fn load_from_path(path: &Path) -> Result<SampleRecord> {
  let content = fs::read_to_string(path)?;
  let record: SampleRecord = serde_json::from_str(&content)
    .map_err(|e| anyhow!("Malformed record {}: {}", path.display(), e))?;
  Ok(record)
}

/// List all plants that have stored records.
pub fn get_plants() -> Result<Vec<String>> {
  let records_root = get_records_root()?;

  if !records_root.exists() {
    return Ok(vec![]);
  }

  let mut plants = Vec::new();

  for entry in fs::read_dir(&records_root)? {
    let entry = entry?;
    if entry.file_type()?.is_dir() {
      if let Some(name) = entry.file_name().to_str() {
        plants.push(name.to_string());
      }
    }
  }

  plants.sort();
  Ok(plants)
}

/// List all records as (plant_name, image_name) pairs, optionally filtered
/// by plant.
pub fn get_records(plant_filter: Option<&str>) -> Result<Vec<(String, String)>> {
  let records_root = get_records_root()?;
  let mut records = Vec::new();

  let search_paths = if let Some(plant) = plant_filter {
    vec![records_root.join(plant)]
  } else {
    get_plants()?.into_iter().map(|plant| records_root.join(plant)).collect()
  };

  for plant_path in search_paths {
    if !plant_path.exists() {
      continue;
    }

    let plant_name = plant_path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown");

    for entry in fs::read_dir(&plant_path)? {
      let entry = entry?;
      let path = entry.path();

      if is_record_file(&path) {
        if let Some(file_stem) = path.file_stem().and_then(|s| s.to_str()) {
          let image_name = file_stem.trim_end_matches(".record");
          records.push((plant_name.to_string(), image_name.to_string()));
        }
      }
    }
  }

  records.sort();
  Ok(records)
}
