use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::{House, Officer};

/// Entries expire after one minute.
/// Long enough to absorb repeated renders, short enough that stale data is rare.
pub const DEFAULT_TTL_SECS: i64 = 60;

#[derive(Debug, Clone)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.cached_at
    }

    pub fn age_display(&self) -> String {
        let seconds = self.age().num_seconds();
        if seconds < 1 {
            // Covers clock skew too
            "just now".to_string()
        } else if seconds < 60 {
            format!("{}s ago", seconds)
        } else if seconds < 3600 {
            format!("{}m ago", seconds / 60)
        } else {
            format!("{}h ago", seconds / 3600)
        }
    }

    /// An entry is fresh while its age is strictly below the TTL.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    AllHouses,
    House(i64),
    AllOfficers,
    Officer(i64),
}

impl CacheKey {
    fn is_house(&self) -> bool {
        matches!(self, CacheKey::AllHouses | CacheKey::House(_))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::AllHouses => write!(f, "all-houses"),
            CacheKey::House(id) => write!(f, "house-{}", id),
            CacheKey::AllOfficers => write!(f, "all-officers"),
            CacheKey::Officer(id) => write!(f, "officer-{}", id),
        }
    }
}

#[derive(Debug, Clone)]
enum CacheEntry {
    Houses(Vec<House>),
    House(House),
    Officers(Vec<Officer>),
    Officer(Officer),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// In-memory TTL cache for access-layer reads.
pub struct CacheManager {
    ttl: Duration,
    entries: HashMap<CacheKey, CachedData<CacheEntry>>,
    hits: u64,
    misses: u64,
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl CacheManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    fn load(&mut self, key: CacheKey) -> Option<&CacheEntry> {
        let state = self
            .entries
            .get(&key)
            .map(|cached| (cached.is_stale(self.ttl), cached.age_display()));

        let fresh = match state {
            Some((false, age)) => {
                debug!(key = %key, age = %age, "Cache hit");
                true
            }
            Some((true, _)) => {
                debug!(key = %key, "Cache entry expired");
                self.entries.remove(&key);
                false
            }
            None => false,
        };

        if fresh {
            self.hits += 1;
            self.entries.get(&key).map(|cached| &cached.data)
        } else {
            self.misses += 1;
            None
        }
    }

    fn save(&mut self, key: CacheKey, entry: CacheEntry) {
        self.entries.insert(key, CachedData::new(entry));
    }

    // ===== Houses =====

    pub fn load_houses(&mut self) -> Option<Vec<House>> {
        match self.load(CacheKey::AllHouses) {
            Some(CacheEntry::Houses(houses)) => Some(houses.clone()),
            _ => None,
        }
    }

    pub fn save_houses(&mut self, houses: &[House]) {
        self.save(CacheKey::AllHouses, CacheEntry::Houses(houses.to_vec()));
    }

    pub fn load_house(&mut self, id: i64) -> Option<House> {
        match self.load(CacheKey::House(id)) {
            Some(CacheEntry::House(house)) => Some(house.clone()),
            _ => None,
        }
    }

    pub fn save_house(&mut self, house: &House) {
        self.save(CacheKey::House(house.id), CacheEntry::House(house.clone()));
    }

    // ===== Officers =====

    pub fn load_officers(&mut self) -> Option<Vec<Officer>> {
        match self.load(CacheKey::AllOfficers) {
            Some(CacheEntry::Officers(officers)) => Some(officers.clone()),
            _ => None,
        }
    }

    pub fn save_officers(&mut self, officers: &[Officer]) {
        self.save(CacheKey::AllOfficers, CacheEntry::Officers(officers.to_vec()));
    }

    pub fn load_officer(&mut self, id: i64) -> Option<Officer> {
        match self.load(CacheKey::Officer(id)) {
            Some(CacheEntry::Officer(officer)) => Some(officer.clone()),
            _ => None,
        }
    }

    pub fn save_officer(&mut self, officer: &Officer) {
        self.save(CacheKey::Officer(officer.id), CacheEntry::Officer(officer.clone()));
    }

    // ===== Invalidation =====

    /// Drop the collection entry and every per-house entry.
    /// Officer entries are unaffected by house writes.
    pub fn invalidate_houses(&mut self) {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.is_house());
        debug!(dropped = before - self.entries.len(), "Invalidated house cache");
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, key: CacheKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
