// src/services/departments.rs

//! Department listing scraper.

use scraper::ElementRef;

use crate::error::Result;
use crate::models::{Department, SourceConfig};
use crate::pipeline::{Collected, Collector};
use crate::services::fetcher::{Fetcher, Payload};
use crate::utils::html::{split_rows, text_of, with_row};
use crate::utils::text::parse_int;
use crate::utils::url::endpoint;

const ROWS: &str = "tbody > tr";

/// Scrapes `{layup}/departments`.
#[derive(Debug, Clone)]
pub struct DepartmentScraper {
    fetcher: Fetcher,
    url: String,
    cookie: String,
}

impl DepartmentScraper {
    pub fn new(fetcher: Fetcher, sources: &SourceConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            url: endpoint(&sources.layup_url, "departments")?,
            cookie: sources.layup_cookie.clone(),
        })
    }

    /// Fetch the listing and extract every row. Departments with one course
    /// or fewer, or with a code that is not plain alphanumeric, count as
    /// excluded.
    pub async fn scrape(&self, collector: &Collector) -> Result<Collected<Department>> {
        let body = self
            .fetcher
            .fetch(&self.url, Payload::Cookie(&self.cookie))
            .await?;
        let rows = split_rows(&body, ROWS)?;

        Ok(collector
            .collect(rows, |row| async move {
                Ok(with_row(&row, extract_department).filter(is_wanted))
            })
            .await)
    }
}

fn is_wanted(department: &Department) -> bool {
    if !department.has_plain_code() {
        log::warn!("Skipping department with unusable code {:?}", department.code);
        return false;
    }
    department.is_listed()
}

pub fn extract_department(row: ElementRef) -> Department {
    Department {
        code: text_of(&row, "td:nth-child(1)").trim().to_string(),
        name: text_of(&row, "td:nth-child(2)").trim().to_string(),
        course_count: parse_int(&text_of(&row, "td:nth-child(3)")),
    }
}
