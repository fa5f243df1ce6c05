//! Department listing data structures.

use serde::{Deserialize, Serialize};

use super::timestamp;

/// A department row from the Layup List department table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Department code (e.g., "COSC")
    pub code: String,

    /// Display name
    pub name: String,

    /// Number of courses listed for the department
    #[serde(rename = "courses")]
    pub course_count: u32,
}

impl Department {
    /// Departments with a single course (or none) are not worth scraping.
    pub fn is_listed(&self) -> bool {
        self.course_count > 1
    }

    /// Codes name artifact files, so only plain ASCII alphanumerics are kept.
    pub fn has_plain_code(&self) -> bool {
        !self.code.is_empty() && self.code.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

/// The `departments.json` artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Departments {
    pub departments: Vec<Department>,
    pub total: usize,
    pub updated: String,
}

impl Departments {
    pub fn new(departments: Vec<Department>) -> Self {
        Self {
            total: departments.len(),
            departments,
            updated: timestamp(),
        }
    }
}
