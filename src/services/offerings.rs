// src/services/offerings.rs

//! Per-department offering search scraper.

use std::collections::HashSet;
use std::sync::Arc;

use scraper::ElementRef;

use crate::error::Result;
use crate::models::{Offering, SourceConfig};
use crate::pipeline::{Collected, Collector};
use crate::services::fetcher::{Fetcher, Payload};
use crate::utils::html::{split_rows, text_of, with_row};
use crate::utils::text::{comma_list, parse_int, resolve_offering_id};
use crate::utils::url::{course_page, endpoint_with_query};

const ROWS: &str = "tbody > tr";

/// Scrapes `{layup}/search?q=<DEPT>` for one department at a time.
#[derive(Debug, Clone)]
pub struct OfferingScraper {
    fetcher: Fetcher,
    layup_url: Arc<str>,
    cookie: String,
}

impl OfferingScraper {
    pub fn new(fetcher: Fetcher, sources: &SourceConfig) -> Self {
        Self {
            fetcher,
            layup_url: Arc::from(sources.layup_url.as_str()),
            cookie: sources.layup_cookie.clone(),
        }
    }

    /// Fetch one department's search page and extract its rows.
    ///
    /// Rows without a course ID are excluded, as are repeats of an ID
    /// already collected.
    pub async fn scrape(&self, department: &str, collector: &Collector) -> Result<Collected<Offering>> {
        let url = endpoint_with_query(&self.layup_url, "search", &[("q", department)])?;
        let body = self
            .fetcher
            .fetch(&url, Payload::Cookie(&self.cookie))
            .await?;
        let rows = split_rows(&body, ROWS)?;

        let department: Arc<str> = Arc::from(department);
        let mut collected = collector
            .collect(rows, |row| {
                let department = Arc::clone(&department);
                let layup_url = Arc::clone(&self.layup_url);
                async move {
                    Ok(with_row(&row, |r| extract_offering(r, &department, &layup_url)).flatten())
                }
            })
            .await;

        let before = collected.values.len();
        let mut seen = HashSet::new();
        collected.values.retain(|o| seen.insert(o.external_id));
        collected.excluded += before - collected.values.len();

        Ok(collected)
    }
}

/// Extract one search-result row; `None` when the row carries no course ID.
pub fn extract_offering(row: ElementRef, department: &str, layup_url: &str) -> Option<Offering> {
    let external_id = row.value().attr("onclick").and_then(resolve_offering_id)?;

    Some(Offering {
        detail_url: course_page(layup_url, external_id).unwrap_or_default(),
        external_id,
        title: text_of(&row, "td:nth-child(1)").trim().to_string(),
        department_code: department.to_string(),
        offered: text_of(&row, "td:nth-child(2)").contains("Offered"),
        distribution_tags: comma_list(&text_of(&row, "td:nth-child(3)")),
        review_count: parse_int(&text_of(&row, "td:nth-child(4)")),
        quality_score: parse_int(&text_of(&row, "td:nth-child(5)")),
        layup_score: parse_int(&text_of(&row, "td:nth-child(6)")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH: &str = r#"
        <table><tbody>
          <tr onclick="window.document.location='/course/3105'">
            <td> COSC001: Introduction to Programming and Computation </td>
            <td>Offered 24F</td>
            <td>TLA, QDS</td>
            <td>214</td><td>12</td><td>-3</td>
          </tr>
          <tr onclick="window.document.location='/course/3110'">
            <td>COSC010: Problem Solving via Object-Oriented Programming</td>
            <td></td><td> </td><td>98</td><td>n/a</td><td>7</td>
          </tr>
          <tr><td>Header-ish row without a link</td></tr>
          <tr onclick="window.document.location='/course/3105'">
            <td>COSC001: Introduction to Programming and Computation</td>
          </tr>
        </tbody></table>
    "#;

    fn rows() -> Vec<String> {
        split_rows(SEARCH, ROWS).unwrap()
    }

    #[test]
    fn test_extract_offering() {
        let rows = rows();
        let offering = with_row(&rows[0], |r| extract_offering(r, "COSC", "https://www.layuplist.com"))
            .flatten()
            .unwrap();

        assert_eq!(offering.external_id, 3105);
        assert_eq!(offering.detail_url, "https://www.layuplist.com/course/3105");
        assert_eq!(
            offering.title,
            "COSC001: Introduction to Programming and Computation"
        );
        assert_eq!(offering.department_code, "COSC");
        assert!(offering.offered);
        assert_eq!(
            offering.distribution_tags,
            Some(vec!["TLA".to_string(), "QDS".to_string()])
        );
        assert_eq!(offering.review_count, 214);
        assert_eq!(offering.quality_score, 12);
        assert_eq!(offering.layup_score, -3);
    }

    #[test]
    fn test_degraded_fields() {
        let rows = rows();
        let offering = with_row(&rows[1], |r| extract_offering(r, "COSC", "https://h.test"))
            .flatten()
            .unwrap();

        assert!(!offering.offered);
        assert_eq!(offering.distribution_tags, None);
        assert_eq!(offering.quality_score, 0);
    }

    #[test]
    fn test_row_without_id_is_dropped() {
        let rows = rows();
        assert!(
            with_row(&rows[2], |r| extract_offering(r, "COSC", "https://h.test"))
                .flatten()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_scrape_dedupes_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "COSC"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH))
            .mount(&server)
            .await;

        let sources = SourceConfig {
            layup_url: server.uri(),
            layup_cookie: "sessionid=abc".into(),
            ..SourceConfig::default()
        };
        let scraper = OfferingScraper::new(Fetcher::new(Client::new()), &sources);
        let collected = scraper.scrape("COSC", &Collector::unbounded()).await.unwrap();

        assert_eq!(collected.total, 4);
        assert_eq!(collected.values.len(), 2);
        assert_eq!(collected.excluded, 2);
        assert!(collected.is_complete());
    }
}
