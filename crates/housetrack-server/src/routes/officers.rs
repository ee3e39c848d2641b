use axum::{
    extract::State,
    response::Json as ResponseJson,
    routing::get,
    Router,
};
use housetrack_core::models::{House, Officer};

use crate::extract::Path;
use crate::{error::AppError, AppState};

/// GET /api/officers
pub async fn list_officers(State(state): State<AppState>) -> ResponseJson<Vec<Officer>> {
    ResponseJson(state.api.fetch_officers().await)
}

/// GET /api/officers/{id}
pub async fn get_officer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<Officer>, AppError> {
    state
        .api
        .fetch_officer_by_id(id)
        .await
        .map(ResponseJson)
        .ok_or_else(|| AppError::NotFound(format!("Officer {}", id)))
}

/// GET /api/officers/{id}/beneficiaries
/// Houses whose assigned officer matches the officer's name.
pub async fn get_officer_beneficiaries(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<Vec<House>>, AppError> {
    state
        .api
        .fetch_houses_for_officer(id)
        .await
        .map(ResponseJson)
        .ok_or_else(|| AppError::NotFound(format!("Officer {}", id)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/officers",
        Router::new()
            .route("/", get(list_officers))
            .route("/{id}", get(get_officer))
            .route("/{id}/beneficiaries", get(get_officer_beneficiaries)),
    )
}
