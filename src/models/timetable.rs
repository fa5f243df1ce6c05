//! Timetable data structures.

use serde::{Deserialize, Serialize};

use super::timestamp;

/// A cross-listing entry, e.g. `AMES 015`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossListing {
    pub dept: String,
    pub num: f64,
}

/// One row of the timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableRow {
    pub building: String,

    pub crn: u32,

    pub department_url: String,

    #[serde(rename = "dist")]
    pub distribution_tags: Option<Vec<String>>,

    #[serde(rename = "current_enrollment")]
    pub enrollment_current: u32,

    pub first_year_seminar: bool,

    pub instructors: Vec<String>,

    #[serde(rename = "max_enrollment")]
    pub enrollment_max: u32,

    pub learning_objective_url: String,

    #[serde(rename = "num")]
    pub catalog_number: f64,

    pub period: String,

    pub room: String,

    #[serde(rename = "sec")]
    pub section: u32,

    pub status: String,

    #[serde(rename = "subj")]
    pub subject: String,

    pub term: u32,

    #[serde(rename = "text")]
    pub textbook_url: String,

    pub title: String,

    pub catalog_url: String,

    #[serde(rename = "wc")]
    pub world_culture_tag: String,

    #[serde(rename = "xlist")]
    pub cross_listings: Option<Vec<CrossListing>>,
}

/// The `timetable.json` artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    pub courses: Vec<TimetableRow>,
    pub total: usize,
    pub updated: String,
}

impl Timetable {
    pub fn new(courses: Vec<TimetableRow>) -> Self {
        Self {
            total: courses.len(),
            courses,
            updated: timestamp(),
        }
    }
}
