//! Combined filter used by the map, manage and list views.

use serde::{Deserialize, Serialize};

use crate::models::{House, Stage};
use crate::utils::contains_ignore_case;

/// Every criterion is optional; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HouseFilter {
    pub constituency: Option<String>,
    pub stage: Option<Stage>,
    /// Matched against name, village, constituency and officer.
    pub search: Option<String>,
    pub min_progress: Option<u8>,
    pub max_progress: Option<u8>,
    /// Stages switched off in the map legend.
    pub hidden_stages: Vec<Stage>,
}

impl HouseFilter {
    pub fn matches(&self, house: &House) -> bool {
        if let Some(ref constituency) = self.constituency {
            if !constituency.is_empty() && house.constituency_label() != constituency.as_str() {
                return false;
            }
        }
        if let Some(ref stage) = self.stage {
            if house.stage != *stage {
                return false;
            }
        }
        if house.progress < self.min_progress.unwrap_or(0)
            || house.progress > self.max_progress.unwrap_or(u8::MAX)
        {
            return false;
        }
        if self.hidden_stages.contains(&house.stage) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                contains_ignore_case(&house.beneficiary_name, term)
                    || contains_ignore_case(&house.village, term)
                    || contains_ignore_case(&house.constituency, term)
                    || contains_ignore_case(&house.assigned_officer, term)
            }
            _ => true,
        }
    }

    pub fn apply<'a>(&self, houses: &'a [House]) -> Vec<&'a House> {
        houses.iter().filter(|h| self.matches(h)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn house(id: i64, constituency: &str, stage: &str, progress: u8, officer: &str) -> House {
        serde_json::from_value(json!({
            "id": id,
            "beneficiaryName": format!("Beneficiary {}", id),
            "constituency": constituency,
            "village": "Khanpur",
            "stage": stage,
            "progress": progress,
            "assignedOfficer": officer
        }))
        .unwrap()
    }

    fn houses() -> Vec<House> {
        vec![
            house(1, "Rampur", "Completed", 100, "Ravi Kumar"),
            house(2, "Rampur", "In Progress", 50, "Meena Singh"),
            house(3, "Sitapur", "Delayed", 10, "Ravi Kumar"),
            house(4, "Sitapur", "Not Started", 0, "Anil"),
        ]
    }

    fn ids(found: Vec<&House>) -> Vec<i64> {
        found.into_iter().map(|h| h.id).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert_eq!(HouseFilter::default().apply(&houses()).len(), 4);
    }

    #[test]
    fn test_constituency_and_stage() {
        let all = houses();
        let filter = HouseFilter {
            constituency: Some("Rampur".to_string()),
            stage: Some(Stage::InProgress),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&all)), vec![2]);
    }

    #[test]
    fn test_blank_constituency_matches_unknown() {
        let all = vec![
            house(1, "Rampur", "Completed", 100, "Ravi"),
            house(2, "  ", "Delayed", 10, "Ravi"),
        ];
        let filter = HouseFilter {
            constituency: Some("Unknown".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&all)), vec![2]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_officer() {
        let all = houses();
        let filter = HouseFilter {
            search: Some("ravi".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&all)), vec![1, 3]);
    }

    #[test]
    fn test_progress_range_and_hidden_stages() {
        let all = houses();
        let filter = HouseFilter {
            min_progress: Some(5),
            max_progress: Some(100),
            hidden_stages: vec![Stage::Completed],
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&all)), vec![2, 3]);
    }

    #[test]
    fn test_filter_from_query_json() {
        let filter: HouseFilter =
            serde_json::from_value(json!({ "stage": "delayed", "minProgress": 5 })).unwrap();
        assert_eq!(filter.stage, Some(Stage::Delayed));
        assert_eq!(ids(filter.apply(&houses())), vec![3]);
    }
}
