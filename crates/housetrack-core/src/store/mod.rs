//! In-memory data store for beneficiaries, officers and uploaded images.
//!
//! The store is seeded once from JSON and mutated in place. Nothing is ever
//! written back, so a restart reverts every change. It is a plain value:
//! callers own it (the access layer wraps it in a lock) and tests can build
//! as many isolated instances as they like.

pub mod seed;

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use rand::Rng;

use crate::models::{House, NewHouse, Officer};

pub use seed::{BENEFICIARIES_FILE, OFFICERS_FILE};

#[derive(Debug, Clone)]
pub struct DataStore {
    houses: Vec<House>,
    officers: Vec<Officer>,
    images: HashMap<String, String>,
    next_id: i64,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::from_seed(Vec::new(), Vec::new())
    }
}

impl DataStore {
    /// Build a store from seed records. Ids continue after the largest
    /// seeded id and are never reused.
    pub fn from_seed(houses: Vec<House>, officers: Vec<Officer>) -> Self {
        let next_id = houses.iter().map(|h| h.id).max().unwrap_or(0) + 1;
        Self {
            houses,
            officers,
            images: HashMap::new(),
            next_id,
        }
    }

    /// Load `beneficiaries.json` and `officers.json` from `data_dir`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let houses = seed::load_houses(&data_dir.join(BENEFICIARIES_FILE))?;
        let officers = seed::load_officers(&data_dir.join(OFFICERS_FILE))?;
        Ok(Self::from_seed(houses, officers))
    }

    // ===== Houses =====

    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    pub fn house(&self, id: i64) -> Option<&House> {
        self.houses.iter().find(|h| h.id == id)
    }

    pub fn house_mut(&mut self, id: i64) -> Option<&mut House> {
        self.houses.iter_mut().find(|h| h.id == id)
    }

    pub fn insert_house(&mut self, house: NewHouse, last_updated: String) -> House {
        let id = self.next_id;
        self.next_id += 1;

        let house = house.into_house(id, last_updated);
        self.houses.push(house.clone());
        house
    }

    pub fn remove_house(&mut self, id: i64) -> bool {
        match self.houses.iter().position(|h| h.id == id) {
            Some(index) => {
                self.houses.remove(index);
                true
            }
            None => false,
        }
    }

    /// Id the next created house will receive.
    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    // ===== Officers =====

    pub fn officers(&self) -> &[Officer] {
        &self.officers
    }

    pub fn officer(&self, id: i64) -> Option<&Officer> {
        self.officers.iter().find(|o| o.id == id)
    }

    // ===== Images =====

    /// Keep an uploaded data URL and return its generated id.
    pub fn insert_image(&mut self, data_url: String) -> String {
        let mut rng = rand::thread_rng();
        let millis = Utc::now().timestamp_millis();
        let mut image_id = format!("img_{}_{}", millis, rng.gen_range(0..1000));
        while self.images.contains_key(&image_id) {
            image_id = format!("img_{}_{}", millis, rng.gen_range(0..1_000_000));
        }
        self.images.insert(image_id.clone(), data_url);
        image_id
    }

    pub fn image(&self, image_id: &str) -> Option<&str> {
        self.images.get(image_id).map(String::as_str)
    }
}
