//! Loading of the static JSON seed documents.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::MAX_PROGRESS;
use crate::models::{House, Officer};

/// Beneficiary seed file name inside the data directory
pub const BENEFICIARIES_FILE: &str = "beneficiaries.json";

/// Officer seed file name inside the data directory
pub const OFFICERS_FILE: &str = "officers.json";

// The dashboard export wraps each list in a named field; hand-edited
// files sometimes carry the bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BeneficiaryFile {
    Wrapped { beneficiaries: Vec<House> },
    Bare(Vec<House>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OfficerFile {
    Wrapped { officers: Vec<Officer> },
    Bare(Vec<Officer>),
}

/// Parse beneficiary records. Progress above 100 is clamped so seeded
/// records obey the same bound as writes.
pub fn parse_houses(contents: &str) -> Result<Vec<House>> {
    let file: BeneficiaryFile =
        serde_json::from_str(contents).context("Failed to parse beneficiary data")?;
    let mut houses = match file {
        BeneficiaryFile::Wrapped { beneficiaries } => beneficiaries,
        BeneficiaryFile::Bare(houses) => houses,
    };
    for house in houses.iter_mut().filter(|h| h.progress > MAX_PROGRESS) {
        warn!(house_id = house.id, progress = house.progress, "Clamping seeded progress");
        house.progress = MAX_PROGRESS;
    }
    Ok(houses)
}

pub fn parse_officers(contents: &str) -> Result<Vec<Officer>> {
    let file: OfficerFile =
        serde_json::from_str(contents).context("Failed to parse officer data")?;
    Ok(match file {
        OfficerFile::Wrapped { officers } => officers,
        OfficerFile::Bare(officers) => officers,
    })
}

pub fn load_houses(path: &Path) -> Result<Vec<House>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    let houses = parse_houses(&contents)
        .with_context(|| format!("Invalid seed file: {}", path.display()))?;
    debug!(path = %path.display(), count = houses.len(), "Loaded beneficiaries");
    Ok(houses)
}

/// Officers are optional: a missing file yields an empty list.
pub fn load_officers(path: &Path) -> Result<Vec<Officer>> {
    if !path.exists() {
        debug!(path = %path.display(), "No officer seed file");
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    let officers = parse_officers(&contents)
        .with_context(|| format!("Invalid seed file: {}", path.display()))?;
    debug!(path = %path.display(), count = officers.len(), "Loaded officers");
    Ok(officers)
}
