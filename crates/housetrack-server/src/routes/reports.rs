use axum::{
    extract::State,
    response::Json as ResponseJson,
    routing::get,
    Router,
};
use chrono::{Datelike, NaiveDate, Utc};
use housetrack_core::reports::{
    self, ConstituencyReport, DashboardSummary, FinancialReport, FundUtilization, HouseFilter,
    MonthlyReport, ReportPeriod, StageCount,
};
use serde::Deserialize;

use super::beneficiaries::BeneficiaryQuery;
use crate::extract::Query;
use crate::{error::AppError, AppState};

/// Months offered in the monthly report picker.
const MONTH_CHOICES: u32 = 12;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConstituencyQuery {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MonthlyQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FinancialQuery {
    pub period: Option<ReportPeriod>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// GET /api/reports/summary
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<BeneficiaryQuery>,
) -> ResponseJson<DashboardSummary> {
    let filter = HouseFilter::from(query);
    let houses = state.api.fetch_houses().await;
    ResponseJson(DashboardSummary::from_houses(filter.apply(&houses)))
}

/// GET /api/reports/stages
pub async fn stages(
    State(state): State<AppState>,
    Query(query): Query<BeneficiaryQuery>,
) -> ResponseJson<Vec<StageCount>> {
    let filter = HouseFilter::from(query);
    let houses = state.api.fetch_houses().await;
    ResponseJson(reports::stage_breakdown(filter.apply(&houses)))
}

/// GET /api/reports/constituency?name=
pub async fn constituency(
    State(state): State<AppState>,
    Query(query): Query<ConstituencyQuery>,
) -> ResponseJson<ConstituencyReport> {
    let houses = state.api.fetch_houses().await;
    ResponseJson(ConstituencyReport::build(&houses, query.name.as_deref()))
}

/// GET /api/reports/monthly?month=&year=
/// Defaults to the current month.
pub async fn monthly(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<ResponseJson<MonthlyReport>, AppError> {
    let today = today();
    let month = query.month.unwrap_or(today.month());
    let year = query.year.unwrap_or(today.year());
    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest(format!("Invalid month: {}", month)));
    }

    let houses = state.api.fetch_houses().await;
    Ok(ResponseJson(MonthlyReport::build(&houses, month, year)))
}

/// GET /api/reports/months
pub async fn months() -> ResponseJson<Vec<String>> {
    ResponseJson(reports::recent_months(today(), MONTH_CHOICES))
}

/// GET /api/reports/financial?period=
pub async fn financial(
    State(state): State<AppState>,
    Query(query): Query<FinancialQuery>,
) -> ResponseJson<FinancialReport> {
    let houses = state.api.fetch_houses().await;
    ResponseJson(FinancialReport::build(
        &houses,
        query.period.unwrap_or_default(),
        today(),
    ))
}

/// GET /api/reports/fund-utilization
pub async fn fund_utilization(State(state): State<AppState>) -> ResponseJson<Vec<FundUtilization>> {
    let houses = state.api.fetch_houses().await;
    ResponseJson(reports::fund_utilization_by_constituency(&houses))
}

/// GET /api/reports/constituencies
pub async fn constituencies(State(state): State<AppState>) -> ResponseJson<Vec<String>> {
    let houses = state.api.fetch_houses().await;
    ResponseJson(reports::constituencies(&houses))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/reports",
        Router::new()
            .route("/summary", get(summary))
            .route("/stages", get(stages))
            .route("/constituency", get(constituency))
            .route("/monthly", get(monthly))
            .route("/months", get(months))
            .route("/financial", get(financial))
            .route("/fund-utilization", get(fund_utilization))
            .route("/constituencies", get(constituencies)),
    )
}
