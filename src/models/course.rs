//! Course detail data structures.

use serde::{Deserialize, Serialize};

use super::Offering;

/// Grade median for one section in one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionMedian {
    #[serde(rename = "median")]
    pub median_grade: String,

    #[serde(rename = "section")]
    pub section_number: u32,

    pub numeric_value: f64,

    pub enrollment: u32,
}

/// Grade medians for one term, as returned by the medians endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianRecord {
    pub term: String,

    #[serde(rename = "courses", default)]
    pub per_section: Vec<SectionMedian>,

    pub avg_numeric_value: f64,
}

/// Body of `GET /api/course/{id}/medians`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediansResponse {
    #[serde(default)]
    pub medians: Vec<MedianRecord>,
}

/// Body of `GET /api/course/{id}/professors`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessorsResponse {
    #[serde(default)]
    pub professors: Vec<String>,
}

/// A fully scraped course. The offering's fields are flattened into the
/// same JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(flatten)]
    pub offering: Offering,

    /// Layup List IDs of cross-listed courses
    #[serde(rename = "xlist")]
    pub cross_listed_ids: Option<Vec<i64>>,

    /// Title without the department prefix
    #[serde(rename = "name")]
    pub display_name: String,

    #[serde(rename = "number")]
    pub catalog_number: f64,

    #[serde(rename = "periods")]
    pub meeting_periods: Option<Vec<String>>,

    pub description: String,

    #[serde(rename = "reviews")]
    pub review_texts: Option<Vec<String>>,

    #[serde(rename = "similar_courses")]
    pub similar_course_ids: Option<Vec<i64>>,

    #[serde(rename = "orc_url")]
    pub catalog_url: String,

    #[serde(rename = "medians")]
    pub median_grade_records: Option<Vec<MedianRecord>>,

    pub terms_offered: Option<Vec<String>>,

    #[serde(rename = "professors")]
    pub professor_names: Option<Vec<String>>,
}

impl Course {
    /// An empty course for the given offering; extractors fill in the rest.
    pub fn new(offering: Offering) -> Self {
        Self {
            offering,
            cross_listed_ids: None,
            display_name: String::new(),
            catalog_number: 0.0,
            meeting_periods: None,
            description: String::new(),
            review_texts: None,
            similar_course_ids: None,
            catalog_url: String::new(),
            median_grade_records: None,
            terms_offered: None,
            professor_names: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.offering.title
    }
}
