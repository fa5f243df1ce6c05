//! Storage abstractions for scraped artifacts.
//!
//! ## Directory Structure
//!
//! ```text
//! {data_dir}/
//! ├── departments.json      # Listed departments
//! ├── courses.json          # Every built course, flattened
//! ├── timetable.json        # ORC timetable rows
//! └── courses/              # Offerings, one file per department
//!     ├── anth.json
//!     └── cosc.json
//! ```
//!
//! Every run overwrites the artifacts wholesale.

pub mod local;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Course, Departments, Offerings, Timetable};

// Re-export for convenience
pub use local::LocalStorage;

pub const DEPARTMENTS_KEY: &str = "departments.json";
pub const COURSES_KEY: &str = "courses.json";
pub const TIMETABLE_KEY: &str = "timetable.json";

/// Key of one department's offerings file, e.g. `courses/cosc.json`.
pub fn offerings_key(department: &str) -> String {
    format!("courses/{}.json", department.to_lowercase())
}

/// Reject keys that could resolve outside the storage root.
///
/// A key is a relative `/`-separated path of non-empty segments, none of
/// which is `.` or `..`.
pub fn check_key(key: &str) -> Result<()> {
    let bad_segment = key
        .split('/')
        .any(|part| part.is_empty() || part == "." || part == "..");
    if bad_segment || key.contains('\\') || key.contains(':') {
        return Err(AppError::validation(format!("Invalid artifact key: {key}")));
    }
    Ok(())
}

/// Trait for artifact storage backends.
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    async fn write_departments(&self, departments: &Departments) -> Result<()>;

    /// Write one department's offerings under [`offerings_key`].
    async fn write_offerings(&self, offerings: &Offerings) -> Result<()>;

    async fn write_courses(&self, courses: &[Course]) -> Result<()>;

    async fn write_timetable(&self, timetable: &Timetable) -> Result<()>;

    /// Previously written timetable, if one exists.
    async fn load_timetable(&self) -> Result<Option<Timetable>>;

    /// Raw bytes of an artifact, `None` if it was never written. Keys failing
    /// [`check_key`] are an error.
    async fn read_raw(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        for key in [DEPARTMENTS_KEY, COURSES_KEY, "courses/cosc.json"] {
            assert!(check_key(key).is_ok(), "{key}");
        }
        for key in [
            "",
            "/etc/passwd",
            "../secret.json",
            "courses/../../escaped.json",
            "courses//cosc.json",
            "./courses.json",
            "courses\\..\\x.json",
            "C:x.json",
        ] {
            assert!(check_key(key).is_err(), "{key}");
        }
    }
}
