//! Pipeline entry points for scraping.
//!
//! - `Collector`: fan-out/fan-in over independent units
//! - `Pipeline::run`: departments, offerings, courses, timetable
//! - `Pipeline::run_timetable`: the timetable stage alone

pub mod collect;
pub mod diff;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use collect::{Collected, Collector};
pub use diff::calculate_diff;
pub use pipeline::Pipeline;
