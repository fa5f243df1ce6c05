// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod course;
mod department;
mod offering;
mod report;
mod timetable;

use chrono::Local;

// Re-export all public types
pub use config::{
    Config, CrawlerConfig, FailurePolicy, ServerConfig, SourceConfig, StorageConfig,
    TimetableForm,
};
pub use course::{Course, MedianRecord, MediansResponse, ProfessorsResponse, SectionMedian};
pub use department::{Department, Departments};
pub use offering::{Offering, Offerings};
pub use report::{ChangeSummary, ScrapeReport};
pub use timetable::{CrossListing, Timetable, TimetableRow};

/// `updated` stamp written into every artifact.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
