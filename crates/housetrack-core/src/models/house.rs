use serde::{Deserialize, Serialize};

use crate::utils::{format_currency, parse_currency};

// ============================================================================
// Stage
// ============================================================================

/// Coarse construction status label.
///
/// Independent of `House::progress`: a house may sit at 100% while still
/// labelled `In Progress`. Labels outside the known set are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    #[default]
    NotStarted,
    Foundation,
    Walls,
    Roof,
    Finishing,
    InProgress,
    Delayed,
    Completed,
    Other(String),
}

impl Stage {
    pub fn label(&self) -> &str {
        match self {
            Stage::NotStarted => "Not Started",
            Stage::Foundation => "Foundation",
            Stage::Walls => "Walls",
            Stage::Roof => "Roof",
            Stage::Finishing => "Finishing",
            Stage::InProgress => "In Progress",
            Stage::Delayed => "Delayed",
            Stage::Completed => "Completed",
            Stage::Other(label) => label,
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_lowercase().as_str() {
            "not started" => Stage::NotStarted,
            "foundation" => Stage::Foundation,
            "walls" => Stage::Walls,
            "roof" => Stage::Roof,
            "finishing" => Stage::Finishing,
            "in progress" => Stage::InProgress,
            "delayed" => Stage::Delayed,
            "completed" => Stage::Completed,
            _ if trimmed.is_empty() => Stage::Other("Unknown".to_string()),
            _ => Stage::Other(trimmed.to_string()),
        }
    }

    /// Stage assigned by the officer quick-update: 100 completes the house,
    /// anything under 25 is flagged as delayed.
    pub fn from_progress(progress: u8) -> Self {
        if progress >= 100 {
            Stage::Completed
        } else if progress < 25 {
            Stage::Delayed
        } else {
            Stage::InProgress
        }
    }

    /// Neither finished nor untouched.
    pub fn is_underway(&self) -> bool {
        !matches!(self, Stage::Completed | Stage::NotStarted)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Stage {
    fn from(label: String) -> Self {
        Stage::parse(&label)
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.label().to_string()
    }
}

// ============================================================================
// Fund details
// ============================================================================

/// Allocated/released/utilized amounts, kept in their formatted form.
///
/// `remaining` is not stored; it is derived as `allocated - utilized` every
/// time the record is serialized or queried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FundDetailsWire", into = "FundDetailsWire")]
pub struct FundDetails {
    pub allocated: String,
    pub released: String,
    pub utilized: String,
}

impl FundDetails {
    pub fn allocated_amount(&self) -> i64 {
        parse_currency(&self.allocated)
    }

    pub fn released_amount(&self) -> i64 {
        parse_currency(&self.released)
    }

    pub fn utilized_amount(&self) -> i64 {
        parse_currency(&self.utilized)
    }

    pub fn remaining_amount(&self) -> i64 {
        self.allocated_amount().saturating_sub(self.utilized_amount())
    }

    pub fn remaining(&self) -> String {
        format_currency(self.remaining_amount())
    }
}

/// JSON shape of [`FundDetails`]. An incoming `remaining` is accepted and
/// dropped; an outgoing one is always recomputed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export, rename = "FundDetails"))]
pub struct FundDetailsWire {
    #[serde(default)]
    pub allocated: String,
    #[serde(default)]
    pub released: String,
    #[serde(default)]
    pub utilized: String,
    #[serde(default)]
    pub remaining: String,
}

impl From<FundDetailsWire> for FundDetails {
    fn from(wire: FundDetailsWire) -> Self {
        Self {
            allocated: wire.allocated,
            released: wire.released,
            utilized: wire.utilized,
        }
    }
}

impl From<FundDetails> for FundDetailsWire {
    fn from(funds: FundDetails) -> Self {
        let remaining = funds.remaining();
        Self {
            allocated: funds.allocated,
            released: funds.released,
            utilized: funds.utilized,
            remaining,
        }
    }
}

// ============================================================================
// Construction details
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum ComponentStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentStatus::NotStarted => write!(f, "Not Started"),
            ComponentStatus::InProgress => write!(f, "In Progress"),
            ComponentStatus::Completed => write!(f, "Completed"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ComponentProgress {
    #[serde(default)]
    pub status: ComponentStatus,
    #[serde(rename = "completionDate", default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
}

impl ComponentProgress {
    /// A completion date only means something once the component is done.
    pub fn normalized(mut self) -> Self {
        if self.status != ComponentStatus::Completed {
            self.completion_date = None;
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ConstructionDetails {
    #[serde(default)]
    pub foundation: ComponentProgress,
    #[serde(default)]
    pub walls: ComponentProgress,
    #[serde(default)]
    pub roof: ComponentProgress,
    #[serde(default)]
    pub finishing: ComponentProgress,
}

impl ConstructionDetails {
    pub fn components(&self) -> [(&'static str, &ComponentProgress); 4] {
        [
            ("foundation", &self.foundation),
            ("walls", &self.walls),
            ("roof", &self.roof),
            ("finishing", &self.finishing),
        ]
    }

    pub fn completed_components(&self) -> usize {
        self.components()
            .iter()
            .filter(|(_, c)| c.status == ComponentStatus::Completed)
            .count()
    }
}

// ============================================================================
// House
// ============================================================================

/// A beneficiary record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct House {
    pub id: i64,
    #[serde(rename = "beneficiaryName")]
    pub beneficiary_name: String,
    #[serde(default)]
    pub constituency: String,
    #[serde(default)]
    pub village: String,
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub stage: Stage,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: String,
    #[serde(rename = "startDate", default)]
    pub start_date: String,
    #[serde(rename = "expectedCompletion", default)]
    pub expected_completion: String,
    #[serde(rename = "contactNumber", default)]
    pub contact_number: String,
    #[serde(rename = "aadharNumber", default)]
    pub aadhar_number: String,
    #[serde(rename = "familyMembers", default)]
    pub family_members: u32,
    #[serde(rename = "assignedOfficer", default)]
    pub assigned_officer: String,
    #[serde(default)]
    pub remarks: String,
    /// Legacy summary column from older exports; kept as written.
    #[serde(rename = "fundUtilized", default, skip_serializing_if = "String::is_empty")]
    pub fund_utilized: String,
    #[serde(rename = "fundDetails", default)]
    #[cfg_attr(feature = "ts", ts(as = "FundDetailsWire"))]
    pub fund_details: FundDetails,
    #[serde(rename = "constructionDetails", default)]
    pub construction_details: ConstructionDetails,
}

impl House {
    /// Constituency used for grouping; blank names group under "Unknown".
    pub fn constituency_label(&self) -> &str {
        if self.constituency.trim().is_empty() {
            "Unknown"
        } else {
            &self.constituency
        }
    }

    pub fn is_completed(&self) -> bool {
        self.stage == Stage::Completed
    }

    /// Apply a partial update. Fields absent from the patch are untouched;
    /// the id never changes.
    pub fn apply(&mut self, patch: HousePatch) {
        let HousePatch {
            beneficiary_name,
            constituency,
            village,
            stage,
            progress,
            lat,
            lng,
            images,
            start_date,
            expected_completion,
            contact_number,
            aadhar_number,
            family_members,
            assigned_officer,
            remarks,
            fund_details,
            construction_details,
        } = patch;

        if let Some(v) = beneficiary_name {
            self.beneficiary_name = v;
        }
        if let Some(v) = constituency {
            self.constituency = v;
        }
        if let Some(v) = village {
            self.village = v;
        }
        if let Some(v) = stage {
            self.stage = v;
        }
        if let Some(v) = progress {
            self.progress = v;
        }
        if let Some(v) = lat {
            self.lat = v;
        }
        if let Some(v) = lng {
            self.lng = v;
        }
        if let Some(v) = images {
            self.images = v;
        }
        if let Some(v) = start_date {
            self.start_date = v;
        }
        if let Some(v) = expected_completion {
            self.expected_completion = v;
        }
        if let Some(v) = contact_number {
            self.contact_number = v;
        }
        if let Some(v) = aadhar_number {
            self.aadhar_number = v;
        }
        if let Some(v) = family_members {
            self.family_members = v;
        }
        if let Some(v) = assigned_officer {
            self.assigned_officer = v;
        }
        if let Some(v) = remarks {
            self.remarks = v;
        }
        if let Some(funds) = fund_details {
            if let Some(v) = funds.allocated {
                self.fund_details.allocated = v;
            }
            if let Some(v) = funds.released {
                self.fund_details.released = v;
            }
            if let Some(v) = funds.utilized {
                self.fund_details.utilized = v;
            }
        }
        if let Some(details) = construction_details {
            let target = &mut self.construction_details;
            for (slot, update) in [
                (&mut target.foundation, details.foundation),
                (&mut target.walls, details.walls),
                (&mut target.roof, details.roof),
                (&mut target.finishing, details.finishing),
            ] {
                if let Some(component) = update {
                    *slot = component.normalized();
                }
            }
        }
    }
}

// ============================================================================
// Write payloads
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundDetailsPatch {
    pub allocated: Option<String>,
    pub released: Option<String>,
    pub utilized: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionDetailsPatch {
    pub foundation: Option<ComponentProgress>,
    pub walls: Option<ComponentProgress>,
    pub roof: Option<ComponentProgress>,
    pub finishing: Option<ComponentProgress>,
}

/// Partial house record for updates. `id` and `lastUpdated` are not
/// accepted: the id is fixed and the date is stamped by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HousePatch {
    #[serde(rename = "beneficiaryName", default)]
    pub beneficiary_name: Option<String>,
    #[serde(default)]
    pub constituency: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,
    #[serde(rename = "expectedCompletion", default)]
    pub expected_completion: Option<String>,
    #[serde(rename = "contactNumber", default)]
    pub contact_number: Option<String>,
    #[serde(rename = "aadharNumber", default)]
    pub aadhar_number: Option<String>,
    #[serde(rename = "familyMembers", default)]
    pub family_members: Option<u32>,
    #[serde(rename = "assignedOfficer", default)]
    pub assigned_officer: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(rename = "fundDetails", default)]
    pub fund_details: Option<FundDetailsPatch>,
    #[serde(rename = "constructionDetails", default)]
    pub construction_details: Option<ConstructionDetailsPatch>,
}

/// A house as submitted for creation, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHouse {
    #[serde(rename = "beneficiaryName")]
    pub beneficiary_name: String,
    #[serde(default)]
    pub constituency: String,
    #[serde(default)]
    pub village: String,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: String,
    #[serde(rename = "expectedCompletion", default)]
    pub expected_completion: String,
    #[serde(rename = "contactNumber", default)]
    pub contact_number: String,
    #[serde(rename = "aadharNumber", default)]
    pub aadhar_number: String,
    #[serde(rename = "familyMembers", default)]
    pub family_members: u32,
    #[serde(rename = "assignedOfficer", default)]
    pub assigned_officer: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(rename = "fundUtilized", default, skip_serializing_if = "String::is_empty")]
    pub fund_utilized: String,
    #[serde(rename = "fundDetails", default)]
    pub fund_details: FundDetails,
    #[serde(rename = "constructionDetails", default)]
    pub construction_details: ConstructionDetails,
}

impl NewHouse {
    pub fn into_house(self, id: i64, last_updated: String) -> House {
        let ConstructionDetails {
            foundation,
            walls,
            roof,
            finishing,
        } = self.construction_details;

        House {
            id,
            beneficiary_name: self.beneficiary_name,
            constituency: self.constituency,
            village: self.village,
            stage: self.stage,
            progress: self.progress,
            lat: self.lat,
            lng: self.lng,
            images: self.images,
            last_updated,
            start_date: self.start_date,
            expected_completion: self.expected_completion,
            contact_number: self.contact_number,
            aadhar_number: self.aadhar_number,
            family_members: self.family_members,
            assigned_officer: self.assigned_officer,
            remarks: self.remarks,
            fund_utilized: self.fund_utilized,
            fund_details: self.fund_details,
            construction_details: ConstructionDetails {
                foundation: foundation.normalized(),
                walls: walls.normalized(),
                roof: roof.normalized(),
                finishing: finishing.normalized(),
            },
        }
    }
}
