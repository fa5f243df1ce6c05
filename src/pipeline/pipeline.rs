// src/pipeline/pipeline.rs

//! Scrape orchestration.
//!
//! Stages run in order and each one starts only after the previous stage's
//! collector has fully drained. Departments are scraped sequentially; the
//! units inside one department (rows, then courses) run concurrently.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{
    Config, Course, Department, Departments, FailurePolicy, Offerings, ScrapeReport, Timetable,
};
use crate::services::{CourseBuilder, DepartmentScraper, Fetcher, OfferingScraper, TimetableScraper};
use crate::storage::CatalogStorage;
use crate::utils::http::create_async_client;
use crate::utils::progress;

use super::collect::{Collected, Collector};
use super::diff::calculate_diff;

/// Runs the scrape stages and persists their artifacts.
pub struct Pipeline {
    config: Arc<Config>,
    fetcher: Fetcher,
    collector: Collector,
    storage: Arc<dyn CatalogStorage>,
}

impl Pipeline {
    pub fn new(config: Config, storage: Arc<dyn CatalogStorage>) -> Result<Self> {
        let client = create_async_client(&config.crawler)?;
        Ok(Self {
            collector: Collector::with_limit(config.crawler.max_concurrent),
            fetcher: Fetcher::new(client),
            config: Arc::new(config),
            storage,
        })
    }

    fn policy(&self) -> FailurePolicy {
        self.config.crawler.failure_policy
    }

    /// Full run: departments, offerings, courses, then the timetable.
    pub async fn run(&self) -> Result<ScrapeReport> {
        progress::header("Course scrape starting");
        let mut report = ScrapeReport::start();

        progress::step(1, 4, "Departments");
        let departments = self.scrape_departments(&mut report).await?;

        progress::step(2, 4, "Offerings");
        let batches = self.scrape_offerings(&departments, &mut report).await?;

        progress::step(3, 4, "Courses");
        let courses = self.build_courses(batches, &mut report).await?;
        self.storage.write_courses(&courses).await?;

        progress::step(4, 4, "Timetable");
        self.scrape_timetable(&mut report).await?;

        let report = report.finish();
        log_report(&report);
        Ok(report)
    }

    /// Timetable stage alone; needs no Layup List cookie.
    pub async fn run_timetable(&self) -> Result<ScrapeReport> {
        progress::header("Timetable scrape starting");
        let mut report = ScrapeReport::start();

        self.scrape_timetable(&mut report).await?;

        let report = report.finish();
        log_report(&report);
        Ok(report)
    }

    async fn scrape_departments(&self, report: &mut ScrapeReport) -> Result<Vec<Department>> {
        let scraper = DepartmentScraper::new(self.fetcher.clone(), &self.config.sources)?;
        let collected = scraper.scrape(&self.collector).await?;
        let mut departments = self.settle("departments", collected, report)?;
        departments.sort_by(|a, b| a.code.cmp(&b.code));

        report.departments = departments.len();
        progress::sub_item(&format!("{} departments listed", departments.len()));

        self.storage
            .write_departments(&Departments::new(departments.clone()))
            .await?;
        Ok(departments)
    }

    async fn scrape_offerings(
        &self,
        departments: &[Department],
        report: &mut ScrapeReport,
    ) -> Result<Vec<Offerings>> {
        let scraper = OfferingScraper::new(self.fetcher.clone(), &self.config.sources);
        let mut batches = Vec::with_capacity(departments.len());

        for department in departments {
            let stage = format!("offerings {}", department.code);
            let collected = match scraper.scrape(&department.code, &self.collector).await {
                Ok(collected) => collected,
                Err(e) => {
                    self.skip_stage(&stage, e, report)?;
                    continue;
                }
            };

            let offerings = self.settle(&stage, collected, report)?;
            let batch = Offerings::new(&department.code, offerings);
            progress::sub_item(&format!("{}: {} offerings", department.code, batch.total));

            report.offerings += batch.total;
            self.storage.write_offerings(&batch).await?;
            batches.push(batch);
        }

        Ok(batches)
    }

    async fn build_courses(
        &self,
        batches: Vec<Offerings>,
        report: &mut ScrapeReport,
    ) -> Result<Vec<Course>> {
        let builder = CourseBuilder::new(self.fetcher.clone(), &self.config.sources);
        let mut courses = Vec::new();

        for batch in batches {
            let stage = format!("courses {}", batch.department);
            let collected = builder.scrape(batch.offerings, &self.collector).await;
            let built = self.settle(&stage, collected, report)?;
            progress::sub_item(&format!("{}: {} courses", batch.department, built.len()));
            courses.extend(built);
        }

        report.courses = courses.len();
        Ok(courses)
    }

    async fn scrape_timetable(&self, report: &mut ScrapeReport) -> Result<()> {
        let scraper = TimetableScraper::new(
            self.fetcher.clone(),
            self.config.sources.orc_url.clone(),
            self.config.timetable.clone(),
        );
        let collected = scraper.scrape(&self.collector).await?;
        let rows = self.settle("timetable", collected, report)?;

        let previous = match self.storage.load_timetable().await {
            Ok(previous) => previous.map(|t| t.courses).unwrap_or_default(),
            Err(e) => {
                log::warn!("Previous timetable unreadable, treating as empty: {e}");
                Vec::new()
            }
        };
        let changes = calculate_diff(&previous, &rows);
        progress::sub_item(&format!(
            "{} rows ({} added, {} removed, {} changed)",
            rows.len(),
            changes.added.len(),
            changes.removed.len(),
            changes.changed.len()
        ));

        report.timetable_rows = rows.len();
        report.timetable_changes = Some(changes);
        self.storage.write_timetable(&Timetable::new(rows)).await
    }

    /// Apply the failure policy to a drained stage and fold its counts into
    /// the report.
    fn settle<R>(
        &self,
        stage: &str,
        collected: Collected<R>,
        report: &mut ScrapeReport,
    ) -> Result<Vec<R>> {
        let collected = collected.settle(stage, self.policy())?;
        report.excluded += collected.excluded;
        report.failures.extend(
            collected
                .failures
                .iter()
                .map(|e| format!("{stage}: {e}")),
        );
        Ok(collected.values)
    }

    /// A page-level failure for one stage: fatal under `abort`, recorded and
    /// skipped under `continue`.
    fn skip_stage(
        &self,
        stage: &str,
        error: AppError,
        report: &mut ScrapeReport,
    ) -> Result<()> {
        match self.policy() {
            FailurePolicy::Abort => Err(error),
            FailurePolicy::Continue => {
                log::warn!("{stage}: skipped: {error}");
                report.failures.push(format!("{stage}: {error}"));
                Ok(())
            }
        }
    }
}

fn log_report(report: &ScrapeReport) {
    let changes = report
        .timetable_changes
        .as_ref()
        .map_or_else(|| "-".to_string(), |c| c.change_count().to_string());

    progress::summary(
        "Scrape finished",
        &[
            ("Departments", report.departments.to_string()),
            ("Offerings", report.offerings.to_string()),
            ("Courses", report.courses.to_string()),
            ("Timetable rows", report.timetable_rows.to_string()),
            ("Timetable changes", changes),
            ("Excluded", report.excluded.to_string()),
            ("Failures", report.failures.len().to_string()),
            ("Elapsed", format!("{}s", report.elapsed_secs())),
        ],
    );
}
