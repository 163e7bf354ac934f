//! Scored condition report derived from the comparison averages.
//!
//! Everything here is deterministic arithmetic over the stage outputs; the
//! narrative layer that used to sit on top is an external collaborator.

use colored::*;
use serde::Serialize;

use crate::compare;
use crate::record::{GroupResult, SimilaritySample, SENSOR_FIELDS};

/// Fields with this score or better count as within range.
const OK_SCORE: i32 = 80;

/// How many of the worst-deviating fields the report calls out.
const TOP_ISSUE_COUNT: usize = 3;

/// One row of the three-way comparison table, rounded to two decimals.
/// Missing averages stay `None` rather than defaulting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
  pub field: String,
  pub similar_avg: Option<f32>,
  pub better_avg: Option<f32>,
  pub worse_avg: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricStatus {
  Ok,
  Low,
  High,
}

impl MetricStatus {
  fn as_str(self) -> &'static str {
    match self {
      MetricStatus::Ok => "ok",
      MetricStatus::Low => "low",
      MetricStatus::High => "high",
    }
  }
}

/// Per-field 0-100 score against the healthier group's average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricScore {
  pub field: String,
  pub score: i32,
  pub status: MetricStatus,
}

/// Scored summary of one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct PlantReport {
  pub plant_name: String,
  pub overall_score: i32,
  pub metric_scores: Vec<MetricScore>,
  pub top_issues: Vec<ComparisonRow>,
}

/// Build the per-field comparison rows from the stage outputs. Empty only
/// when no group produced an average at all.
pub fn comparison_rows(similar: &[SimilaritySample], groups: &GroupResult) -> Vec<ComparisonRow> {
  let curr_vectors: Vec<&[f32]> = similar.iter().map(|s| s.sensor_vector.as_slice()).collect();
  let pos_vectors: Vec<&[f32]> =
    groups.positive.iter().map(|s| s.sensor_vector.as_slice()).collect();
  let neg_vectors: Vec<&[f32]> =
    groups.negative.iter().map(|s| s.sensor_vector.as_slice()).collect();

  let curr_avg = compare::vector_mean(&curr_vectors);
  let pos_avg = compare::vector_mean(&pos_vectors);
  let neg_avg = compare::vector_mean(&neg_vectors);

  if curr_avg.is_none() && pos_avg.is_none() && neg_avg.is_none() {
    return vec![];
  }

  SENSOR_FIELDS
    .iter()
    .enumerate()
    .map(|(i, field)| ComparisonRow {
      field: field.to_string(),
      similar_avg: curr_avg.as_ref().map(|avg| compare::round2(avg[i])),
      better_avg: pos_avg.as_ref().map(|avg| compare::round2(avg[i])),
      worse_avg: neg_avg.as_ref().map(|avg| compare::round2(avg[i])),
    })
    .collect()
}

/// Score each field by its relative deviation from the healthier group's
/// average: 150% deviation or more scores zero.
pub fn metric_scores(rows: &[ComparisonRow]) -> Vec<MetricScore> {
  rows
    .iter()
    .map(|row| {
      let current = row.similar_avg.unwrap_or(0.0);
      let ideal = row.better_avg.unwrap_or(current);
      let diff_ratio =
        if ideal == 0.0 { 0.0 } else { (current - ideal).abs() / ideal };
      let score = (100.0 - diff_ratio * 100.0 * 1.5).max(0.0) as i32;

      let status = if score >= OK_SCORE {
        MetricStatus::Ok
      } else if current < ideal {
        MetricStatus::Low
      } else {
        MetricStatus::High
      };

      MetricScore { field: row.field.clone(), score, status }
    })
    .collect()
}

/// Blend a base score from the stated growth level (70%) with the average
/// metric score (30%).
pub fn overall_score(growth_level: &str, scores: &[MetricScore]) -> i32 {
  let base = match growth_level.trim().to_uppercase().as_str() {
    "HIGH" => 90,
    "MEDIUM" => 70,
    "LOW" => 50,
    _ => 30,
  };

  let avg_metric = if scores.is_empty() {
    0.0
  } else {
    scores.iter().map(|s| s.score as f64).sum::<f64>() / scores.len() as f64
  };

  (base as f64 * 0.7 + avg_metric * 0.3).round() as i32
}

/// The rows deviating most from the healthier group, by relative deviation.
pub fn top_issues(rows: &[ComparisonRow], count: usize) -> Vec<ComparisonRow> {
  let mut ranked: Vec<&ComparisonRow> = rows
    .iter()
    .filter(|row| row.similar_avg.is_some() && row.better_avg.is_some())
    .collect();

  ranked.sort_by(|a, b| {
    relative_deviation(b).partial_cmp(&relative_deviation(a)).unwrap_or(std::cmp::Ordering::Equal)
  });

  ranked.into_iter().take(count).cloned().collect()
}

fn relative_deviation(row: &ComparisonRow) -> f32 {
  let current = row.similar_avg.unwrap_or(0.0);
  let ideal = row.better_avg.unwrap_or(0.0);
  if ideal == 0.0 {
    return 0.0;
  }
  (current - ideal).abs() / ideal
}

/// Assemble the full report for one analysis.
pub fn generate_report(
  plant_name: &str,
  growth_level: &str,
  similar: &[SimilaritySample],
  groups: &GroupResult,
) -> PlantReport {
  let rows = comparison_rows(similar, groups);
  let scores = metric_scores(&rows);
  let overall = overall_score(growth_level, &scores);
  let issues = top_issues(&rows, TOP_ISSUE_COUNT);

  PlantReport {
    plant_name: plant_name.to_string(),
    overall_score: overall,
    metric_scores: scores,
    top_issues: issues,
  }
}

/// Print the report summary.
pub fn display_report(report: &PlantReport) {
  let overall = if report.overall_score >= OK_SCORE {
    report.overall_score.to_string().green()
  } else {
    report.overall_score.to_string().yellow()
  };
  println!("\n{} {} ({}/100)", "Condition report for".bold(), report.plant_name.blue(), overall);

  for metric in &report.metric_scores {
    println!("  {:<16} {:>3}  {}", metric.field, metric.score, metric.status.as_str());
  }

  if !report.top_issues.is_empty() {
    println!("{}", "Largest deviations:".bold());
    for issue in &report.top_issues {
      println!(
        "  {} ({:.2} vs {:.2})",
        issue.field.cyan(),
        issue.similar_avg.unwrap_or(0.0),
        issue.better_avg.unwrap_or(0.0)
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(field: &str, similar: f32, better: f32) -> ComparisonRow {
    ComparisonRow {
      field: field.to_string(),
      similar_avg: Some(similar),
      better_avg: Some(better),
      worse_avg: None,
    }
  }

  #[test]
  fn perfect_match_scores_full_marks() {
    let scores = metric_scores(&[row("AirTemperature", 25.0, 25.0)]);
    assert_eq!(scores[0].score, 100);
    assert_eq!(scores[0].status, MetricStatus::Ok);
  }

  #[test]
  fn deviations_lower_the_score_and_set_direction() {
    let scores = metric_scores(&[row("AirHumidity", 40.0, 80.0)]);
    assert_eq!(scores[0].score, 25);
    assert_eq!(scores[0].status, MetricStatus::Low);

    let scores = metric_scores(&[row("AirTemperature", 30.0, 20.0)]);
    assert_eq!(scores[0].score, 25);
    assert_eq!(scores[0].status, MetricStatus::High);
  }

  #[test]
  fn missing_better_average_counts_as_in_range() {
    let rows = [ComparisonRow {
      field: "Co2".to_string(),
      similar_avg: Some(400.0),
      better_avg: None,
      worse_avg: None,
    }];
    let scores = metric_scores(&rows);
    assert_eq!(scores[0].score, 100);
  }

  #[test]
  fn overall_score_blends_base_and_metrics() {
    let scores = metric_scores(&[row("AirTemperature", 25.0, 25.0)]);
    // High base 90, perfect metrics 100: 90*0.7 + 100*0.3 = 93
    assert_eq!(overall_score("High", &scores), 93);
    assert_eq!(overall_score("DIE", &[]), 21);
  }

  #[test]
  fn top_issues_rank_by_relative_deviation() {
    let rows = vec![
      row("AirTemperature", 30.0, 25.0), // 20% off
      row("AirHumidity", 40.0, 80.0),    // 50% off
      row("Co2", 400.0, 404.0),          // ~1% off
      row("Quantum", 100.0, 250.0),      // 60% off
    ];

    let issues = top_issues(&rows, 3);
    assert_eq!(issues.len(), 3);
    assert_eq!(issues[0].field, "Quantum");
    assert_eq!(issues[1].field, "AirHumidity");
    assert_eq!(issues[2].field, "AirTemperature");
  }

  #[test]
  fn rows_are_empty_without_any_data() {
    let groups = GroupResult::default();
    assert!(comparison_rows(&[], &groups).is_empty());
  }
}
