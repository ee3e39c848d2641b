//! Core library for housetrack.
//!
//! Tracks house-construction beneficiaries across constituencies: the
//! in-memory store seeded from JSON, a TTL-cached access layer, the demo
//! session/role context and the report aggregations every view shares.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod reports;
pub mod store;
pub mod utils;

pub use api::{ApiError, SchemeApi};
pub use config::Config;
pub use store::DataStore;
