//! Offering (search result row) data structures.

use serde::{Deserialize, Serialize};

use super::timestamp;

/// A single course offering from a department's Layup List search page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    /// Course page on Layup List
    #[serde(rename = "layup_url")]
    pub detail_url: String,

    /// Layup List course ID; the key for every per-course request
    #[serde(rename = "layup_id")]
    pub external_id: i64,

    pub title: String,

    #[serde(rename = "department")]
    pub department_code: String,

    /// Whether the course is offered in the current term
    pub offered: bool,

    #[serde(rename = "distribs")]
    pub distribution_tags: Option<Vec<String>>,

    #[serde(rename = "total_reviews")]
    pub review_count: u32,

    pub quality_score: i32,

    pub layup_score: i32,
}

/// The `courses/<dept>.json` artifact: one department's offerings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offerings {
    #[serde(skip)]
    pub department: String,

    #[serde(rename = "courses")]
    pub offerings: Vec<Offering>,

    pub updated: String,

    pub total: usize,
}

impl Offerings {
    pub fn new(department: impl Into<String>, offerings: Vec<Offering>) -> Self {
        Self {
            department: department.into(),
            total: offerings.len(),
            offerings,
            updated: timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        let offerings = Offerings::new(
            "COSC",
            vec![Offering {
                detail_url: "https://www.layuplist.com/course/3105".into(),
                external_id: 3105,
                title: "COSC001: Introduction to Programming and Computation".into(),
                department_code: "COSC".into(),
                offered: false,
                distribution_tags: None,
                review_count: 0,
                quality_score: 0,
                layup_score: 0,
            }],
        );

        let value = serde_json::to_value(&offerings).unwrap();
        assert!(value.get("department").is_none());
        assert_eq!(value["total"], 1);
        assert_eq!(value["courses"][0]["layup_id"], 3105);
        assert_eq!(value["courses"][0]["department"], "COSC");
        assert!(value["courses"][0]["distribs"].is_null());
    }
}
