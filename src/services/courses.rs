// src/services/courses.rs

//! Course builder.
//!
//! One course needs four requests: the detail page, the review page and the
//! medians and professors JSON endpoints. They are issued together and the
//! pages are parsed once all four bodies are in hand.

use std::sync::Arc;

use scraper::{ElementRef, Html};

use crate::error::Result;
use crate::models::{Course, MediansResponse, Offering, ProfessorsResponse, SourceConfig};
use crate::pipeline::{Collected, Collector};
use crate::services::fetcher::{Fetcher, Payload};
use crate::utils::html::{document_text, select_all, select_in, text_of};
use crate::utils::text::{
    collapse_whitespace, comma_list, dept_segment, first_decimal_number, parenthesised,
    resolve_cross_listing_id, resolve_similar_course_id, strip_dept_prefix,
};
use crate::utils::url::course_api;

const PERIODS: &str = "div:nth-child(1) > div > h4";
const DESCRIPTION: &str = "div:nth-child(1) > div > p:nth-child(3)";

#[derive(Debug)]
struct Sources {
    layup_url: String,
    cookie: String,
    catalog_prefix: String,
}

/// Builds full [`Course`] records from offerings.
#[derive(Debug, Clone)]
pub struct CourseBuilder {
    fetcher: Fetcher,
    sources: Arc<Sources>,
}

impl CourseBuilder {
    pub fn new(fetcher: Fetcher, sources: &SourceConfig) -> Self {
        Self {
            fetcher,
            sources: Arc::new(Sources {
                layup_url: sources.layup_url.clone(),
                cookie: sources.layup_cookie.clone(),
                catalog_prefix: sources.catalog_prefix.clone(),
            }),
        }
    }

    /// Build one course per offering in the batch.
    pub async fn scrape(&self, offerings: Vec<Offering>, collector: &Collector) -> Collected<Course> {
        collector
            .collect(offerings, |offering| {
                let builder = self.clone();
                async move { builder.build(offering).await.map(Some) }
            })
            .await
    }

    /// Fetch everything one course needs and assemble it.
    pub async fn build(&self, offering: Offering) -> Result<Course> {
        let id = offering.external_id;
        let cookie = self.sources.cookie.as_str();
        let review_url = format!("{}/review_search", offering.detail_url.trim_end_matches('/'));
        let medians_url = course_api(&self.sources.layup_url, id, "medians")?;
        let professors_url = course_api(&self.sources.layup_url, id, "professors")?;

        let (detail, reviews, medians, professors) = futures::try_join!(
            self.fetcher.fetch(&offering.detail_url, Payload::Cookie(cookie)),
            self.fetcher.fetch(&review_url, Payload::Cookie(cookie)),
            self.fetcher.fetch_json::<MediansResponse>(&medians_url, cookie),
            self.fetcher.fetch_json::<ProfessorsResponse>(&professors_url, cookie),
        )?;

        let mut course = Course::new(offering);
        apply_detail_page(&mut course, &detail, &self.sources.catalog_prefix);
        course.review_texts = extract_reviews(&reviews);
        apply_sub_resources(&mut course, medians, professors);

        log::debug!("built {} ({})", course.title(), id);
        Ok(course)
    }
}

/// Fill the fields that come from the course detail page.
pub fn apply_detail_page(course: &mut Course, body: &str, catalog_prefix: &str) {
    let doc = Html::parse_document(body);
    let title = course.title().to_string();

    course.display_name = strip_dept_prefix(&title);
    course.catalog_number = first_decimal_number(dept_segment(&title));

    let paragraphs = select_all(&doc, "p");
    course.cross_listed_ids = find_crosslist_anchors(&paragraphs).map(|anchors| {
        anchors
            .iter()
            .filter_map(|a| a.value().attr("href"))
            .filter_map(resolve_cross_listing_id)
            .collect()
    });

    course.meeting_periods = parenthesised(&document_text(&doc, PERIODS)).and_then(comma_list);

    let description = document_text(&doc, DESCRIPTION);
    course.description = if description.contains("ORC") || description.contains("Crosslisted") {
        String::new()
    } else {
        description.trim().to_string()
    };

    let similar: Vec<i64> = select_all(&doc, "tr[onclick]")
        .iter()
        .filter_map(|tr| tr.value().attr("onclick"))
        .filter_map(resolve_similar_course_id)
        .collect();
    course.similar_course_ids = (!similar.is_empty()).then_some(similar);

    course.catalog_url = select_all(&doc, "a")
        .iter()
        .rev()
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains(catalog_prefix))
        .unwrap_or_default()
        .to_string();
}

/// The anchors of the last node mentioning "Crosslisted", if any.
pub fn find_crosslist_anchors<'a>(nodes: &[ElementRef<'a>]) -> Option<Vec<ElementRef<'a>>> {
    let node = nodes
        .iter()
        .rfind(|n| n.text().collect::<String>().contains("Crosslisted"))?;
    Some(select_in(node, "a"))
}

/// One text per review row, whitespace collapsed. Rows without cell text
/// (header rows) are skipped; `None` when the page has no rows at all.
pub fn extract_reviews(body: &str) -> Option<Vec<String>> {
    let doc = Html::parse_document(body);
    let rows = select_all(&doc, "tr");
    if rows.is_empty() {
        return None;
    }

    Some(
        rows.iter()
            .map(|tr| collapse_whitespace(&text_of(tr, "td")))
            .filter(|text| !text.is_empty())
            .collect(),
    )
}

/// Fill the fields that come from the two JSON endpoints.
pub fn apply_sub_resources(course: &mut Course, medians: MediansResponse, professors: ProfessorsResponse) {
    if !medians.medians.is_empty() {
        course.terms_offered = Some(medians.medians.iter().map(|m| m.term.clone()).collect());
        course.median_grade_records = Some(medians.medians);
    }
    if !professors.professors.is_empty() {
        course.professor_names = Some(professors.professors);
    }
}
