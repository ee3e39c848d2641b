use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json as ResponseJson,
    routing::{get, post},
    Router,
};
use housetrack_core::auth::Role;
use serde::{Deserialize, Serialize};

use crate::extract::{Json, Path};
use crate::{error::AppError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImage {
    pub data_url: String,
}

#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub id: String,
    pub data_url: String,
}

/// POST /api/images
/// Images are kept in memory only; the returned url resolves through
/// `GET /api/images/{id}` for the life of the process.
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UploadImage>,
) -> Result<(StatusCode, ResponseJson<UploadedImage>), AppError> {
    state.require(&headers, Role::can_edit).await?;

    let url = state.api.upload_image(payload.data_url).await?;
    Ok((StatusCode::CREATED, ResponseJson(UploadedImage { url })))
}

/// GET /api/images/{id}
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<StoredImage>, AppError> {
    match state.api.get_image(&id).await {
        Some(data_url) => Ok(ResponseJson(StoredImage { id, data_url })),
        None => Err(AppError::NotFound(format!("Image {}", id))),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/images", post(upload_image))
        .route("/images/{id}", get(get_image))
}
