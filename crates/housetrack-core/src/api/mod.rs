//! Access layer over the in-memory store.
//!
//! This module provides `SchemeApi`, the fetch/create/update/delete surface
//! the dashboard views and HTTP handlers go through. Reads are served from a
//! short-lived TTL cache; every house write invalidates it. Each call waits
//! out a configurable artificial latency before touching the store.

pub mod client;
pub mod error;

pub use client::SchemeApi;
pub use error::{ApiError, MAX_PROGRESS};
