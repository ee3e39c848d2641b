//! Application configuration management.
//!
//! Settings come from `~/.config/housetrack/config.json` when it exists,
//! then from `HOUSETRACK_*` environment variables, which win. Every field
//! has a default so the server starts with no configuration at all.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_LATENCY_MS;
use crate::cache::DEFAULT_TTL_SECS;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "housetrack";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ENV_DATA_DIR: &str = "HOUSETRACK_DATA_DIR";
const ENV_BIND: &str = "HOUSETRACK_BIND";
const ENV_CACHE_TTL: &str = "HOUSETRACK_CACHE_TTL_SECS";
const ENV_LATENCY: &str = "HOUSETRACK_LATENCY_MS";
const ENV_LOG_DIR: &str = "HOUSETRACK_LOG_DIR";
const ENV_SESSION_DIR: &str = "HOUSETRACK_SESSION_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding `beneficiaries.json` and `officers.json`.
    pub data_dir: PathBuf,
    pub bind: String,
    pub cache_ttl_secs: i64,
    pub latency_ms: u64,
    /// Daily-rolling log files are written here when set.
    pub log_dir: Option<PathBuf>,
    /// Where `session.json` lives; defaults to the user cache directory.
    pub session_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            bind: "127.0.0.1:3000".to_string(),
            cache_ttl_secs: DEFAULT_TTL_SECS,
            latency_ms: DEFAULT_LATENCY_MS,
            log_dir: None,
            session_dir: None,
        }
    }
}

impl Config {
    /// Config file (if any) with environment overrides applied.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse config: {}", path.display()))?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `HOUSETRACK_*` overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(bind) = get(ENV_BIND) {
            self.bind = bind;
        }
        if let Some(ttl) = get(ENV_CACHE_TTL) {
            self.cache_ttl_secs = ttl
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_CACHE_TTL))?;
        }
        if let Some(latency) = get(ENV_LATENCY) {
            self.latency_ms = latency
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of milliseconds", ENV_LATENCY))?;
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = get(ENV_SESSION_DIR) {
            self.session_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn session_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.session_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs.max(0))
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}
