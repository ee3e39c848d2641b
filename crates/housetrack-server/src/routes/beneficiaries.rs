use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json as ResponseJson,
    routing::{get, put},
    Router,
};
use housetrack_core::auth::Role;
use housetrack_core::models::{House, HousePatch, NewHouse, Stage};
use housetrack_core::reports::HouseFilter;
use serde::Deserialize;

use crate::extract::{Json, Path, Query};
use crate::{error::AppError, AppState};

/// Query-string form of `HouseFilter`. Hidden stages arrive as one
/// comma-separated value, e.g. `?hidden=Completed,Delayed`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeneficiaryQuery {
    pub constituency: Option<String>,
    pub stage: Option<String>,
    pub search: Option<String>,
    pub min_progress: Option<u8>,
    pub max_progress: Option<u8>,
    pub hidden: Option<String>,
}

impl From<BeneficiaryQuery> for HouseFilter {
    fn from(query: BeneficiaryQuery) -> Self {
        let hidden_stages = query
            .hidden
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Stage::parse)
            .collect();

        HouseFilter {
            constituency: query.constituency.filter(|c| !c.is_empty() && c != "All"),
            stage: query
                .stage
                .filter(|s| !s.is_empty() && s != "All")
                .map(|s| Stage::parse(&s)),
            search: query.search,
            min_progress: query.min_progress,
            max_progress: query.max_progress,
            hidden_stages,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProgressUpdate {
    pub progress: u8,
}

/// GET /api/beneficiaries
pub async fn list_beneficiaries(
    State(state): State<AppState>,
    Query(query): Query<BeneficiaryQuery>,
) -> ResponseJson<Vec<House>> {
    let filter = HouseFilter::from(query);
    let houses = state.api.fetch_houses().await;
    ResponseJson(filter.apply(&houses).into_iter().cloned().collect())
}

/// GET /api/beneficiaries/{id}
pub async fn get_beneficiary(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<House>, AppError> {
    state
        .api
        .fetch_house_by_id(id)
        .await
        .map(ResponseJson)
        .ok_or_else(|| AppError::NotFound(format!("Beneficiary {}", id)))
}

/// POST /api/beneficiaries
pub async fn create_beneficiary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewHouse>,
) -> Result<(StatusCode, ResponseJson<House>), AppError> {
    state.require(&headers, Role::can_create).await?;

    let house = state.api.add_house(payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(house)))
}

/// PUT /api/beneficiaries/{id}
pub async fn update_beneficiary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<HousePatch>,
) -> Result<ResponseJson<House>, AppError> {
    state.require(&headers, Role::can_edit).await?;

    state
        .api
        .update_house(id, patch)
        .await?
        .map(ResponseJson)
        .ok_or_else(|| AppError::NotFound(format!("Beneficiary {}", id)))
}

/// PUT /api/beneficiaries/{id}/progress
/// Quick progress update; the stage follows the new value.
pub async fn update_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<ProgressUpdate>,
) -> Result<ResponseJson<House>, AppError> {
    state.require(&headers, Role::can_update_progress).await?;

    state
        .api
        .update_house_progress(id, payload.progress)
        .await?
        .map(ResponseJson)
        .ok_or_else(|| AppError::NotFound(format!("Beneficiary {}", id)))
}

/// DELETE /api/beneficiaries/{id}
pub async fn delete_beneficiary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.require(&headers, Role::can_delete).await?;

    if state.api.delete_house(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Beneficiary {}", id)))
    }
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/beneficiaries",
        Router::new()
            .route("/", get(list_beneficiaries).post(create_beneficiary))
            .route(
                "/{id}",
                get(get_beneficiary)
                    .put(update_beneficiary)
                    .delete(delete_beneficiary),
            )
            .route("/{id}/progress", put(update_progress)),
    )
}
