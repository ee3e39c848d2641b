//! `SchemeApi`: cached CRUD access to the beneficiary store.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::cache::{CacheManager, CacheStats};
use crate::models::{House, HousePatch, NewHouse, Officer, Stage};
use crate::store::DataStore;

use super::ApiError;

/// Artificial delay applied to uncached reads and to every write.
/// Mirrors the round trip a dashboard would see against a real backend.
pub const DEFAULT_LATENCY_MS: u64 = 50;

struct Inner {
    // Lock order is always cache, then store. Writers hold the cache lock
    // across the mutation, and readers hold it from the store read until the
    // copy is cached, so no reader can repopulate it with a stale copy. The
    // cache lock is never held across the simulated latency.
    cache: Mutex<CacheManager>,
    store: RwLock<DataStore>,
    latency: Duration,
}

/// Access layer handle.
/// Clone is cheap - all clones share one store and one cache.
#[derive(Clone)]
pub struct SchemeApi {
    inner: Arc<Inner>,
}

impl SchemeApi {
    pub fn new(store: DataStore, cache: CacheManager, latency: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                cache: Mutex::new(cache),
                store: RwLock::new(store),
                latency,
            }),
        }
    }

    /// No latency and the default TTL. Intended for tests and tools.
    pub fn immediate(store: DataStore) -> Self {
        Self::new(store, CacheManager::default(), Duration::ZERO)
    }

    async fn delay(&self) {
        if !self.inner.latency.is_zero() {
            tokio::time::sleep(self.inner.latency).await;
        }
    }

    fn today() -> String {
        Utc::now().date_naive().format("%Y-%m-%d").to_string()
    }

    // ===== Houses =====

    /// Snapshot of every house.
    pub async fn fetch_houses(&self) -> Vec<House> {
        if let Some(houses) = self.inner.cache.lock().await.load_houses() {
            return houses;
        }

        self.delay().await;

        let mut cache = self.inner.cache.lock().await;
        let houses = self.inner.store.read().await.houses().to_vec();
        cache.save_houses(&houses);
        houses
    }

    /// Look up a house. Misses are not cached.
    pub async fn fetch_house_by_id(&self, id: i64) -> Option<House> {
        if let Some(house) = self.inner.cache.lock().await.load_house(id) {
            return Some(house);
        }

        self.delay().await;

        let mut cache = self.inner.cache.lock().await;
        let house = self.inner.store.read().await.house(id).cloned();
        if let Some(ref house) = house {
            cache.save_house(house);
        }
        house
    }

    /// Merge `patch` into the house and stamp today's date.
    /// Returns `Ok(None)` if no house has this id.
    pub async fn update_house(&self, id: i64, patch: HousePatch) -> Result<Option<House>, ApiError> {
        if let Some(progress) = patch.progress {
            ApiError::check_progress(progress)?;
        }

        self.delay().await;

        let mut cache = self.inner.cache.lock().await;
        let updated = {
            let mut store = self.inner.store.write().await;
            store.house_mut(id).map(|house| {
                house.apply(patch);
                house.last_updated = Self::today();
                house.clone()
            })
        };

        if updated.is_some() {
            cache.invalidate_houses();
            info!(house_id = id, "Updated house");
        } else {
            debug!(house_id = id, "Update for unknown house");
        }
        Ok(updated)
    }

    /// Officer quick-update: set progress and move the stage along with it
    /// (100 completes, under 25 is delayed, anything else is in progress).
    pub async fn update_house_progress(&self, id: i64, progress: u8) -> Result<Option<House>, ApiError> {
        ApiError::check_progress(progress)?;

        let patch = HousePatch {
            progress: Some(progress),
            stage: Some(Stage::from_progress(progress)),
            ..Default::default()
        };
        self.update_house(id, patch).await
    }

    /// Create a house with the next id.
    pub async fn add_house(&self, house: NewHouse) -> Result<House, ApiError> {
        if house.beneficiary_name.trim().is_empty() {
            return Err(ApiError::Validation("beneficiary name is required".to_string()));
        }
        ApiError::check_progress(house.progress)?;

        self.delay().await;

        let mut cache = self.inner.cache.lock().await;
        let created = self
            .inner
            .store
            .write()
            .await
            .insert_house(house, Self::today());
        cache.invalidate_houses();

        info!(house_id = created.id, "Created house");
        Ok(created)
    }

    /// Remove a house. `false` if it did not exist.
    pub async fn delete_house(&self, id: i64) -> bool {
        self.delay().await;

        let mut cache = self.inner.cache.lock().await;
        let removed = self.inner.store.write().await.remove_house(id);
        if removed {
            cache.invalidate_houses();
            info!(house_id = id, "Deleted house");
        }
        removed
    }

    // ===== Officers =====

    pub async fn fetch_officers(&self) -> Vec<Officer> {
        if let Some(officers) = self.inner.cache.lock().await.load_officers() {
            return officers;
        }

        self.delay().await;

        let mut cache = self.inner.cache.lock().await;
        let officers = self.inner.store.read().await.officers().to_vec();
        cache.save_officers(&officers);
        officers
    }

    pub async fn fetch_officer_by_id(&self, id: i64) -> Option<Officer> {
        if let Some(officer) = self.inner.cache.lock().await.load_officer(id) {
            return Some(officer);
        }

        self.delay().await;

        let mut cache = self.inner.cache.lock().await;
        let officer = self.inner.store.read().await.officer(id).cloned();
        if let Some(ref officer) = officer {
            cache.save_officer(officer);
        }
        officer
    }

    /// Houses whose `assignedOfficer` names this officer.
    /// `None` when the officer doesn't exist.
    pub async fn fetch_houses_for_officer(&self, officer_id: i64) -> Option<Vec<House>> {
        let officer = self.fetch_officer_by_id(officer_id).await?;
        let houses = self.fetch_houses().await;
        Some(houses.into_iter().filter(|h| officer.is_assigned(h)).collect())
    }

    // ===== Images =====

    /// Keep an uploaded image and return the URL it is served under.
    pub async fn upload_image(&self, data_url: String) -> Result<String, ApiError> {
        if !data_url.starts_with("data:") {
            return Err(ApiError::Validation("image must be a data URL".to_string()));
        }

        self.delay().await;

        let image_id = self.inner.store.write().await.insert_image(data_url);
        debug!(image_id = %image_id, "Stored image");
        Ok(format!("/api/images/{}", image_id))
    }

    pub async fn get_image(&self, image_id: &str) -> Option<String> {
        self.inner.store.read().await.image(image_id).map(str::to_string)
    }

    // ===== Diagnostics =====

    pub async fn cache_stats(&self) -> CacheStats {
        self.inner.cache.lock().await.stats()
    }
}
