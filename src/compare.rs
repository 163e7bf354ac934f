//! Environmental comparator: average the sensor readings of the similar set
//! and the reference groups, then turn the deviation from the healthier
//! group into concrete adjustment advice.

use colored::*;

use crate::record::{AdviceItem, GroupResult, SimilaritySample, SENSOR_FIELDS};

/// Deviations smaller than this are sensor noise and produce no advice.
const NOISE_FLOOR: f32 = 0.1;

/// One advice rule: applies to fields whose name contains `marker`, fires on
/// the given diff condition.
///
/// TODO: replace the substring markers with explicit field identifiers once
/// the sensor schema grows dedicated PH/EC columns.
struct AdviceRule {
  marker: &'static str,
  fires: fn(f32) -> bool,
  message: fn(f32) -> String,
}

/// Evaluated per field in this order; first match wins.
///
/// The PH and EC rules match no current field and are retained for the
/// schema extensions they anticipate.
static ADVICE_RULES: [AdviceRule; 6] = [
  AdviceRule {
    marker: "Temp",
    fires: |diff| diff > 0.0,
    message: |diff| format!("temperature too high ({:+.2}), lower it a little", diff),
  },
  AdviceRule {
    marker: "Temp",
    fires: |diff| diff < 0.0,
    message: |diff| format!("temperature too low ({:+.2}), raise it", diff),
  },
  AdviceRule {
    marker: "Humidity",
    fires: |diff| diff < 0.0,
    message: |diff| format!("too dry ({:.2}), increase watering or humidity", diff.abs()),
  },
  AdviceRule {
    marker: "Humidity",
    fires: |diff| diff > 0.0,
    message: |diff| format!("too humid ({:+.2}), increase ventilation", diff),
  },
  AdviceRule {
    marker: "PH",
    fires: |diff| diff.abs() > 0.3,
    message: |diff| format!("pH deviation ({:+.2}) too large, adjust toward the target range", diff),
  },
  AdviceRule {
    marker: "EC",
    fires: |diff| diff > 0.5,
    message: |_| "fertilizer concentration (EC) too high, dilute before feeding".to_string(),
  },
];

/// Element-wise arithmetic mean over equal-length vectors. `None` for empty
/// input: the explicit insufficient-data signal, never an error.
pub fn vector_mean(vectors: &[&[f32]]) -> Option<Vec<f32>> {
  let first = vectors.first()?;
  let mut sum = vec![0.0f32; first.len()];

  for vector in vectors {
    for (acc, value) in sum.iter_mut().zip(vector.iter()) {
      *acc += value;
    }
  }

  let count = vectors.len() as f32;
  Some(sum.into_iter().map(|acc| acc / count).collect())
}

/// Per-field advice from the rounded deviation between the subject's average
/// environment and the healthier group's average.
pub fn explain_sensor_diff(curr_avg: &[f32], pos_avg: &[f32], fields: &[&str]) -> Vec<AdviceItem> {
  let mut advice = Vec::new();

  for (i, field) in fields.iter().enumerate() {
    let diff = round2(curr_avg[i] - pos_avg[i]);
    if diff.abs() < NOISE_FLOOR {
      continue;
    }
    if let Some(item) = classify(field, diff) {
      advice.push(item);
    }
  }

  advice
}

fn classify(field: &str, diff: f32) -> Option<AdviceItem> {
  ADVICE_RULES
    .iter()
    .find(|rule| field.contains(rule.marker) && (rule.fires)(diff))
    .map(|rule| AdviceItem { field: field.to_string(), message: (rule.message)(diff) })
}

/// Compare the subject's average environment against both reference groups
/// and return advice benchmarked against the healthier one.
///
/// The weaker group's average is shown for context only; advice is derived
/// solely from the healthier group, per the original diagnosis design.
pub fn compare_environment(similar: &[SimilaritySample], groups: &GroupResult) -> Vec<AdviceItem> {
  let curr_vectors: Vec<&[f32]> = similar.iter().map(|s| s.sensor_vector.as_slice()).collect();
  let pos_vectors: Vec<&[f32]> =
    groups.positive.iter().map(|s| s.sensor_vector.as_slice()).collect();
  let neg_vectors: Vec<&[f32]> =
    groups.negative.iter().map(|s| s.sensor_vector.as_slice()).collect();

  let neg_avg = vector_mean(&neg_vectors);
  let (Some(curr_avg), Some(pos_avg)) = (vector_mean(&curr_vectors), vector_mean(&pos_vectors))
  else {
    println!("{}", "Not enough data to compare environments".yellow());
    return vec![];
  };

  println!("\n{}", "Sensor averages".bold());
  println!("{:<16} {:>10} {:>10} {:>10}", "field", "similar", "healthier", "weaker");
  println!("{}", "-".repeat(50));
  for (i, field) in SENSOR_FIELDS.iter().enumerate() {
    let weaker =
      neg_avg.as_ref().map(|avg| format!("{:.2}", avg[i])).unwrap_or_else(|| "-".to_string());
    println!("{:<16} {:>10.2} {:>10.2} {:>10}", field, curr_avg[i], pos_avg[i], weaker);
  }
  println!("{}", "-".repeat(50));

  explain_sensor_diff(&curr_avg, &pos_avg, &SENSOR_FIELDS)
}

pub(crate) fn round2(value: f32) -> f32 {
  (value * 100.0).round() / 100.0
}
