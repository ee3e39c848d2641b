//! Stage counts, dashboard totals and constituency breakdowns.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::{House, Stage};
use crate::utils::percentage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: Stage,
    pub count: usize,
}

/// Count houses per stage label, in stage order. Every input house lands in
/// exactly one bucket, so the counts sum to the input size.
pub fn stage_breakdown<'a>(houses: impl IntoIterator<Item = &'a House>) -> Vec<StageCount> {
    let mut counts: BTreeMap<&Stage, usize> = BTreeMap::new();
    for house in houses {
        *counts.entry(&house.stage).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(stage, count)| StageCount {
            stage: stage.clone(),
            count,
        })
        .collect()
}

/// Sorted unique constituency names; blank names become "Unknown".
pub fn constituencies(houses: &[House]) -> Vec<String> {
    houses
        .iter()
        .map(|h| h.constituency_label().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Mean progress rounded to a whole percent; 0 for no houses.
fn average_progress(houses: &[&House]) -> i64 {
    if houses.is_empty() {
        return 0;
    }
    let total: i64 = houses.iter().map(|h| i64::from(h.progress)).sum();
    (total as f64 / houses.len() as f64).round() as i64
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_houses: usize,
    pub completed_houses: usize,
    pub in_progress_houses: usize,
    pub delayed_houses: usize,
    pub overall_progress: i64,
    pub completed_percentage: i64,
    pub in_progress_percentage: i64,
    pub delayed_percentage: i64,
}

impl DashboardSummary {
    pub fn from_houses<'a>(houses: impl IntoIterator<Item = &'a House>) -> Self {
        let houses: Vec<&House> = houses.into_iter().collect();
        let total = houses.len();
        let count = |stage: Stage| houses.iter().filter(|h| h.stage == stage).count();
        let completed = count(Stage::Completed);
        let in_progress = count(Stage::InProgress);
        let delayed = count(Stage::Delayed);

        let progress_sum: i64 = houses.iter().map(|h| i64::from(h.progress)).sum();
        let total = total as i64;

        Self {
            total_houses: houses.len(),
            completed_houses: completed,
            in_progress_houses: in_progress,
            delayed_houses: delayed,
            overall_progress: percentage(progress_sum, total * 100),
            completed_percentage: percentage(completed as i64, total),
            in_progress_percentage: percentage(in_progress as i64, total),
            delayed_percentage: percentage(delayed as i64, total),
        }
    }
}

// ============================================================================
// Constituency report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageRow {
    pub village: String,
    pub houses: usize,
    pub completed: usize,
    pub completion_percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituencyReport {
    /// `None` covers every constituency.
    pub constituency: Option<String>,
    pub total_houses: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub average_progress: i64,
    pub stages: Vec<StageCount>,
    pub villages: Vec<VillageRow>,
}

impl ConstituencyReport {
    /// Report for one constituency, or all of them when `constituency` is
    /// `None` or `"All"`.
    pub fn build(houses: &[House], constituency: Option<&str>) -> Self {
        let constituency = constituency.filter(|c| !c.is_empty() && *c != "All");
        let selected: Vec<&House> = houses
            .iter()
            .filter(|h| constituency.map_or(true, |c| h.constituency_label() == c))
            .collect();

        let mut villages: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for house in selected.iter().filter(|h| !h.village.trim().is_empty()) {
            let entry = villages.entry(house.village.as_str()).or_default();
            entry.0 += 1;
            if house.is_completed() {
                entry.1 += 1;
            }
        }

        Self {
            constituency: constituency.map(str::to_string),
            total_houses: selected.len(),
            completed: selected.iter().filter(|h| h.is_completed()).count(),
            in_progress: selected.iter().filter(|h| h.stage.is_underway()).count(),
            not_started: selected.iter().filter(|h| h.stage == Stage::NotStarted).count(),
            average_progress: average_progress(&selected),
            stages: stage_breakdown(selected.iter().copied()),
            villages: villages
                .into_iter()
                .map(|(village, (total, completed))| VillageRow {
                    village: village.to_string(),
                    houses: total,
                    completed,
                    completion_percentage: percentage(completed as i64, total as i64),
                })
                .collect(),
        }
    }
}
