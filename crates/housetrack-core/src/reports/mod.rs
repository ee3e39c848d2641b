//! Aggregations over the house collection.
//!
//! Every dashboard, analytics and report view derives its numbers here, so
//! currency parsing, stage grouping and percentage rounding behave the same
//! everywhere. All functions are pure: they take a slice of houses (and a
//! reference date where time matters) and return serializable rows.

pub mod filter;
pub mod periodic;
pub mod summary;

pub use filter::HouseFilter;
pub use periodic::{
    fund_utilization_by_constituency, parse_month_label, recent_months, ConstituencyFunds,
    FinancialReport, FundTotals, FundUtilization, MonthlyReport, ReportPeriod, StageFunds,
};
pub use summary::{
    constituencies, stage_breakdown, ConstituencyReport, DashboardSummary, StageCount, VillageRow,
};
