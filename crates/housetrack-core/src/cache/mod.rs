//! In-memory caching for access-layer reads.
//!
//! This module provides the `CacheManager`, a short-lived TTL cache keyed by
//! operation and id. Entries are considered stale after 60 seconds by default.
//!
//! Cached data types include:
//! - The full house collection and individual houses
//! - The full officer collection and individual officers
//!
//! Any house write drops every house entry.

pub mod manager;

pub use manager::{CacheKey, CacheManager, CacheStats, CachedData, DEFAULT_TTL_SECS};
