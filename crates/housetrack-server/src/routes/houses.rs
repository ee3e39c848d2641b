use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use housetrack_core::store::BENEFICIARIES_FILE;
use serde_json::{json, Value};
use tracing::error;

use crate::AppState;

/// GET /api/houses
/// Raw beneficiary file, re-read from disk on every request. This reflects
/// the seed data, not in-memory edits.
pub async fn get_houses(State(state): State<AppState>) -> Response {
    let path = state.data_dir.join(BENEFICIARIES_FILE);

    let parsed = match tokio::fs::read_to_string(&path).await {
        Ok(contents) => serde_json::from_str::<Value>(&contents).map_err(anyhow::Error::from),
        Err(e) => Err(anyhow::Error::from(e)),
    };

    match parsed {
        Ok(houses) => Json(houses).into_response(),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Error reading beneficiaries file");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to load beneficiary data" })),
            )
                .into_response()
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/houses", get(get_houses))
}
