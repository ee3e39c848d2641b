//! Data models for scheme beneficiaries and officers.
//!
//! - `House`: a beneficiary record with construction stage, fund and
//!   component progress
//! - `Officer`: a field officer, linked to houses by name
//! - `HousePatch`, `NewHouse`: write payloads for the access layer

pub mod house;
pub mod officer;

pub use house::{
    ComponentProgress, ComponentStatus, ConstructionDetails, ConstructionDetailsPatch,
    FundDetails, FundDetailsPatch, FundDetailsWire, House, HousePatch, NewHouse, Stage,
};
pub use officer::Officer;
