use serde::{Deserialize, Serialize};

use crate::utils::format_phone;

use super::House;

/// A field officer responsible for a set of houses.
///
/// `assigned_houses` is informational only. Houses name their officer in
/// free text, so the working link is a name match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Officer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub constituency: String,
    #[serde(rename = "contactNumber", default)]
    pub contact_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "assignedHouses", default)]
    pub assigned_houses: Vec<i64>,
}

impl Officer {
    /// Whether `house` names this officer.
    pub fn is_assigned(&self, house: &House) -> bool {
        house.assigned_officer.trim() == self.name.trim()
    }

    pub fn display_contact(&self) -> String {
        format_phone(&self.contact_number)
    }
}
