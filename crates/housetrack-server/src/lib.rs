//! HTTP surface for the housetrack dashboard.
//!
//! `app` builds the axum router over a shared `AppState`. The binary in
//! `main.rs` wires configuration, seed data and logging around it; the
//! integration tests mount the same router on an ephemeral port.

pub mod error;
pub mod extract;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{http::HeaderMap, Router};
use housetrack_core::auth::{Role, Session};
use housetrack_core::SchemeApi;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::AppError;

/// Shared handler state. Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    pub api: SchemeApi,
    pub session: Arc<RwLock<Session>>,
    /// Directory the raw beneficiary file is served from.
    pub data_dir: PathBuf,
}

impl AppState {
    pub fn new(api: SchemeApi, session: Session, data_dir: PathBuf) -> Self {
        Self {
            api,
            session: Arc::new(RwLock::new(session)),
            data_dir,
        }
    }

    /// Resolve the bearer token to the signed-in role and check it has the
    /// capability `allowed` asks for.
    pub async fn require(
        &self,
        headers: &HeaderMap,
        allowed: impl Fn(&Role) -> bool,
    ) -> Result<Role, AppError> {
        let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
        let role = self
            .session
            .read()
            .await
            .authorize(token)
            .ok_or(AppError::Unauthorized)?;
        if allowed(&role) {
            Ok(role)
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
