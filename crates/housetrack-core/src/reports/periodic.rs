//! Time-windowed reports: monthly progress and fund totals per period.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{House, Stage};
use crate::utils::{parse_date, percentage};

use super::summary::{stage_breakdown, StageCount};

// ============================================================================
// Months
// ============================================================================

/// The last `count` months as `"March 2024"` labels, current month first.
pub fn recent_months(today: NaiveDate, count: u32) -> Vec<String> {
    let first_of_month = today.with_day(1).unwrap_or(today);
    (0..count)
        .filter_map(|i| first_of_month.checked_sub_months(Months::new(i)))
        .map(|d| d.format("%B %Y").to_string())
        .collect()
}

/// Parse a `"March 2024"` label into `(month, year)`.
pub fn parse_month_label(label: &str) -> Option<(u32, i32)> {
    let date = NaiveDate::parse_from_str(&format!("1 {}", label.trim()), "%d %B %Y").ok()?;
    Some((date.month(), date.year()))
}

fn updated_on(house: &House) -> Option<NaiveDate> {
    parse_date(&house.last_updated)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub total_houses: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub stages: Vec<StageCount>,
    pub house_ids: Vec<i64>,
}

impl MonthlyReport {
    /// Houses last updated during the given calendar month. Houses without
    /// a readable `lastUpdated` are left out.
    pub fn build(houses: &[House], month: u32, year: i32) -> Self {
        let selected: Vec<&House> = houses
            .iter()
            .filter(|h| {
                updated_on(h).is_some_and(|d| d.month() == month && d.year() == year)
            })
            .collect();

        Self {
            month,
            year,
            total_houses: selected.len(),
            completed: selected.iter().filter(|h| h.is_completed()).count(),
            in_progress: selected.iter().filter(|h| h.stage.is_underway()).count(),
            not_started: selected.iter().filter(|h| h.stage == Stage::NotStarted).count(),
            stages: stage_breakdown(selected.iter().copied()),
            house_ids: selected.iter().map(|h| h.id).collect(),
        }
    }
}

// ============================================================================
// Financial
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportPeriod {
    #[serde(rename = "Last Month", alias = "last-month")]
    LastMonth,
    #[serde(rename = "Last 3 Months", alias = "last-3-months")]
    Last3Months,
    #[default]
    #[serde(rename = "Last 6 Months", alias = "last-6-months")]
    Last6Months,
    #[serde(rename = "Last Year", alias = "last-year")]
    LastYear,
}

impl ReportPeriod {
    fn months(&self) -> u32 {
        match self {
            ReportPeriod::LastMonth => 1,
            ReportPeriod::Last3Months => 3,
            ReportPeriod::Last6Months => 6,
            ReportPeriod::LastYear => 12,
        }
    }

    /// First day included in the period.
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportPeriod::LastMonth => write!(f, "Last Month"),
            ReportPeriod::Last3Months => write!(f, "Last 3 Months"),
            ReportPeriod::Last6Months => write!(f, "Last 6 Months"),
            ReportPeriod::LastYear => write!(f, "Last Year"),
        }
    }
}

/// Summed fund amounts in whole rupees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundTotals {
    pub allocated: i64,
    pub released: i64,
    pub utilized: i64,
    /// allocated - utilized, matching each record's derived `remaining`.
    pub remaining: i64,
    /// released - utilized: money handed out but not yet spent.
    pub unspent_released: i64,
}

impl FundTotals {
    pub fn from_houses<'a>(houses: impl IntoIterator<Item = &'a House>) -> Self {
        let mut totals = Self::default();
        for house in houses {
            let funds = &house.fund_details;
            totals.allocated = totals.allocated.saturating_add(funds.allocated_amount());
            totals.released = totals.released.saturating_add(funds.released_amount());
            totals.utilized = totals.utilized.saturating_add(funds.utilized_amount());
        }
        totals.remaining = totals.allocated.saturating_sub(totals.utilized);
        totals.unspent_released = totals.released.saturating_sub(totals.utilized);
        totals
    }

    pub fn utilization_percentage(&self) -> i64 {
        percentage(self.utilized, self.allocated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituencyFunds {
    pub constituency: String,
    pub houses: usize,
    pub allocated: i64,
    pub utilized: i64,
    pub utilization_percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageFunds {
    pub stage: Stage,
    pub houses: usize,
    pub allocated: i64,
    pub released: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub period: ReportPeriod,
    pub since: NaiveDate,
    pub total_houses: usize,
    pub totals: FundTotals,
    pub by_constituency: Vec<ConstituencyFunds>,
    pub by_stage: Vec<StageFunds>,
}

impl FinancialReport {
    /// Fund totals over houses updated on or after the period start.
    pub fn build(houses: &[House], period: ReportPeriod, today: NaiveDate) -> Self {
        let since = period.start(today);
        let selected: Vec<&House> = houses
            .iter()
            .filter(|h| updated_on(h).is_some_and(|d| d >= since))
            .collect();

        let mut constituencies: BTreeMap<&str, Vec<&House>> = BTreeMap::new();
        let mut stages: BTreeMap<&Stage, Vec<&House>> = BTreeMap::new();
        for house in &selected {
            constituencies
                .entry(house.constituency_label())
                .or_default()
                .push(house);
            stages.entry(&house.stage).or_default().push(house);
        }

        Self {
            period,
            since,
            total_houses: selected.len(),
            totals: FundTotals::from_houses(selected.iter().copied()),
            by_constituency: constituencies
                .into_iter()
                .map(|(constituency, group)| {
                    let totals = FundTotals::from_houses(group.iter().copied());
                    ConstituencyFunds {
                        constituency: constituency.to_string(),
                        houses: group.len(),
                        allocated: totals.allocated,
                        utilized: totals.utilized,
                        utilization_percentage: totals.utilization_percentage(),
                    }
                })
                .collect(),
            by_stage: stages
                .into_iter()
                .map(|(stage, group)| {
                    let totals = FundTotals::from_houses(group.iter().copied());
                    StageFunds {
                        stage: stage.clone(),
                        houses: group.len(),
                        allocated: totals.allocated,
                        released: totals.released,
                    }
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundUtilization {
    pub constituency: String,
    pub houses: usize,
    pub total: i64,
    pub average: i64,
}

/// Total and mean utilized amount per constituency.
pub fn fund_utilization_by_constituency(houses: &[House]) -> Vec<FundUtilization> {
    let mut groups: BTreeMap<&str, (usize, i64)> = BTreeMap::new();
    for house in houses {
        let entry = groups.entry(house.constituency_label()).or_default();
        entry.0 += 1;
        entry.1 = entry.1.saturating_add(house.fund_details.utilized_amount());
    }

    groups
        .into_iter()
        .map(|(constituency, (count, total))| FundUtilization {
            constituency: constituency.to_string(),
            houses: count,
            total,
            average: (total as f64 / count as f64).round() as i64,
        })
        .collect()
}
