//! Scraping services.
//!
//! - Outbound requests (`Fetcher`)
//! - Department listing (`DepartmentScraper`)
//! - Per-department offerings (`OfferingScraper`)
//! - Full course records (`CourseBuilder`)
//! - ORC timetable (`TimetableScraper`)
//!
//! Each scraper fetches one page, splits it into rows and hands the rows to a
//! [`Collector`](crate::pipeline::Collector). The extractors are plain
//! functions over a parsed row and never fail.

pub mod courses;
pub mod departments;
pub mod fetcher;
pub mod offerings;
pub mod timetable;

pub use courses::CourseBuilder;
pub use departments::DepartmentScraper;
pub use fetcher::{Fetcher, Payload};
pub use offerings::OfferingScraper;
pub use timetable::TimetableScraper;
