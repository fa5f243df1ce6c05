// src/services/timetable.rs

//! ORC timetable scraper.
//!
//! The timetable is a single form POST; every data row becomes one
//! [`TimetableRow`].

use scraper::ElementRef;

use crate::error::Result;
use crate::models::{CrossListing, TimetableForm, TimetableRow};
use crate::pipeline::{Collected, Collector};
use crate::services::fetcher::{Fetcher, Payload};
use crate::utils::html::{attr_of, split_rows, text_of, with_row};
use crate::utils::text::{
    comma_list, cross_list_dept, first_decimal_number, or_list, parse_int, unwrap_js_link,
};

const ROWS: &str = "div.data-table > table > tbody > tr";

/// Cross-listing cells shorter than this hold no entries.
const MIN_CROSS_LIST_LEN: usize = 5;

#[derive(Debug, Clone)]
pub struct TimetableScraper {
    fetcher: Fetcher,
    url: String,
    form: TimetableForm,
}

impl TimetableScraper {
    pub fn new(fetcher: Fetcher, url: impl Into<String>, form: TimetableForm) -> Self {
        Self {
            fetcher,
            url: url.into(),
            form,
        }
    }

    /// Post the search form and extract every row. Rows without a CRN are
    /// excluded.
    pub async fn scrape(&self, collector: &Collector) -> Result<Collected<TimetableRow>> {
        let body = self
            .fetcher
            .fetch(&self.url, Payload::Form(&self.form))
            .await?;
        let rows = split_rows(&body, ROWS)?;
        log::debug!("timetable returned {} rows", rows.len());

        Ok(collector
            .collect(rows, |row| async move {
                Ok(with_row(&row, extract_timetable_row).filter(|r| r.crn != 0))
            })
            .await)
    }
}

fn cell(row: &ElementRef, n: usize) -> String {
    text_of(row, &format!("td:nth-child({n})")).trim().to_string()
}

fn cell_link(row: &ElementRef, n: usize) -> String {
    attr_of(row, &format!("td:nth-child({n}) > a"), "href")
        .map(|href| unwrap_js_link(&href))
        .unwrap_or_default()
}

fn cell_link_text(row: &ElementRef, n: usize) -> String {
    text_of(row, &format!("td:nth-child({n}) > a")).trim().to_string()
}

pub fn extract_timetable_row(row: ElementRef) -> TimetableRow {
    TimetableRow {
        term: parse_int(&cell(&row, 1)),
        crn: parse_int(&cell(&row, 2)),
        subject: cell_link_text(&row, 3),
        department_url: cell_link(&row, 3),
        catalog_number: first_decimal_number(&cell(&row, 4)),
        section: parse_int(&cell(&row, 5)),
        first_year_seminar: cell(&row, 6) == "Y",
        title: cell_link_text(&row, 8),
        catalog_url: cell_link(&row, 8),
        textbook_url: cell_link(&row, 9),
        cross_listings: parse_cross_listings(&cell(&row, 10)),
        period: cell(&row, 11),
        room: cell(&row, 12),
        building: cell(&row, 13),
        instructors: comma_list(&cell(&row, 14)).unwrap_or_default(),
        world_culture_tag: cell(&row, 15),
        distribution_tags: or_list(&cell(&row, 16)),
        enrollment_max: parse_int(&cell(&row, 17)),
        enrollment_current: parse_int(&cell(&row, 18)),
        status: cell(&row, 19),
        learning_objective_url: cell_link(&row, 20),
    }
}

/// `"AMES 015, REL 019.05"` → two listings; short cells hold none.
fn parse_cross_listings(text: &str) -> Option<Vec<CrossListing>> {
    if text.len() < MIN_CROSS_LIST_LEN {
        return None;
    }
    Some(
        text.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| CrossListing {
                dept: cross_list_dept(entry),
                num: first_decimal_number(entry),
            })
            .collect(),
    )
}
