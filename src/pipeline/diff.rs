//! Diff calculation between timetable snapshots.
//!
//! Rows are matched by CRN. The previous snapshot is whatever
//! `timetable.json` held before the current run overwrote it.

use std::collections::HashMap;

use crate::models::{ChangeSummary, TimetableRow};

/// Calculate the diff between previous and current snapshots.
///
/// A row whose CRN appears in both but whose content differs is reported as
/// changed. CRN lists come back sorted.
pub fn calculate_diff(previous: &[TimetableRow], current: &[TimetableRow]) -> ChangeSummary {
    let prev_map: HashMap<u32, &TimetableRow> = previous.iter().map(|r| (r.crn, r)).collect();
    let curr_map: HashMap<u32, &TimetableRow> = current.iter().map(|r| (r.crn, r)).collect();

    let mut added: Vec<u32> = curr_map
        .keys()
        .filter(|crn| !prev_map.contains_key(crn))
        .copied()
        .collect();

    let mut removed: Vec<u32> = prev_map
        .keys()
        .filter(|crn| !curr_map.contains_key(crn))
        .copied()
        .collect();

    let mut changed: Vec<u32> = curr_map
        .iter()
        .filter(|(crn, row)| prev_map.get(crn).is_some_and(|prev| prev != *row))
        .map(|(crn, _)| *crn)
        .collect();

    added.sort_unstable();
    removed.sort_unstable();
    changed.sort_unstable();

    ChangeSummary {
        added,
        removed,
        changed,
    }
}
