//! Route table. Each submodule owns one resource and exposes `router()`.

pub mod beneficiaries;
pub mod houses;
pub mod images;
pub mod officers;
pub mod reports;
pub mod session;

use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(houses::router())
        .merge(beneficiaries::router())
        .merge(officers::router())
        .merge(images::router())
        .merge(session::router())
        .merge(reports::router())
}
