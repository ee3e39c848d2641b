use axum::{
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
    Router,
};
use housetrack_core::auth::{self, Role, SessionData};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::extract::Json;
use crate::{error::AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub role: Role,
    pub token: String,
}

impl From<&SessionData> for LoginResponse {
    fn from(data: &SessionData) -> Self {
        Self {
            username: data.username.clone(),
            role: data.role,
            token: data.token.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub username: Option<String>,
    pub role: Option<Role>,
}

/// POST /api/session/login
/// Signing in replaces whoever was signed in before.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<LoginResponse>, AppError> {
    let data = auth::login(payload.username.trim(), &payload.password)?;
    let response = LoginResponse::from(&data);

    state.session.write().await.set_user(Some(data))?;
    info!(username = %response.username, role = %response.role, "Signed in");

    Ok(ResponseJson(response))
}

/// POST /api/session/logout
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.session.write().await.clear()?;
    info!("Signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/session
pub async fn current_session(State(state): State<AppState>) -> ResponseJson<SessionStatus> {
    let session = state.session.read().await;
    ResponseJson(SessionStatus {
        authenticated: session.is_authenticated(),
        username: session.data.as_ref().map(|d| d.username.clone()),
        role: session.role(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", get(current_session))
        .route("/session/login", post(login))
        .route("/session/logout", post(logout))
}
