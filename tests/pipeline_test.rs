//! End-to-end scrape against mocked Layup List and ORC servers.

mod common;

use std::sync::Arc;

use common::{
    DEPARTMENTS, SEARCH, TIMETABLE, config, mock_sources, mount_course, mount_html,
};
use course_crawler::error::AppError;
use course_crawler::models::{Course, Departments, FailurePolicy, Timetable};
use course_crawler::pipeline::Pipeline;
use course_crawler::storage::{CatalogStorage, LocalStorage};
use serde_json::Value;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn read_json(dir: &TempDir, key: &str) -> Value {
    let bytes = std::fs::read(dir.path().join(key)).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_full_run_writes_every_artifact() {
    let server = mock_sources().await;
    let tmp = TempDir::new().unwrap();
    let storage = Arc::new(LocalStorage::new(tmp.path()));

    let pipeline = Pipeline::new(config(&server, tmp.path()), storage.clone()).unwrap();
    let report = pipeline.run().await.unwrap();

    assert_eq!(report.departments, 1);
    assert_eq!(report.offerings, 2);
    assert_eq!(report.courses, 2);
    assert_eq!(report.timetable_rows, 1);
    assert!(report.failures.is_empty());

    let departments: Departments = serde_json::from_value(read_json(&tmp, "departments.json")).unwrap();
    assert_eq!(departments.total, 1);
    assert_eq!(departments.departments[0].code, "COSC");

    let offerings = read_json(&tmp, "courses/cosc.json");
    assert_eq!(offerings["total"], 2);
    assert!(!tmp.path().join("courses/coco.json").exists());

    let mut courses: Vec<Course> = serde_json::from_value(read_json(&tmp, "courses.json")).unwrap();
    courses.sort_by_key(|c| c.offering.external_id);
    assert_eq!(courses.len(), 2);

    let intro = &courses[0];
    assert_eq!(intro.offering.external_id, 3105);
    assert_eq!(intro.display_name, "Introduction to Programming and Computation");
    assert_eq!(intro.catalog_number, 1.0);
    assert_eq!(intro.cross_listed_ids, Some(vec![4001]));
    assert_eq!(intro.similar_course_ids, Some(vec![3110]));
    assert_eq!(intro.meeting_periods, Some(vec!["24F".into(), "25W".into()]));
    assert_eq!(intro.review_texts, Some(vec!["24F with Smith:Loved it.".into()]));
    assert_eq!(intro.terms_offered, Some(vec!["24F".into()]));
    assert_eq!(intro.professor_names, Some(vec!["Ada Lovelace".into()]));

    let timetable: Timetable = serde_json::from_value(read_json(&tmp, "timetable.json")).unwrap();
    assert_eq!(timetable.total, 1);
    assert_eq!(timetable.courses[0].crn, 91234);
    assert_eq!(timetable.courses[0].distribution_tags, None);

    let changes = report.timetable_changes.unwrap();
    assert_eq!(changes.added, vec![91234]);
}

#[tokio::test]
async fn test_second_timetable_run_reports_no_changes() {
    let server = mock_sources().await;
    let tmp = TempDir::new().unwrap();
    let storage = Arc::new(LocalStorage::new(tmp.path()));

    let mut config = config(&server, tmp.path());
    config.sources.layup_cookie.clear();
    let pipeline = Pipeline::new(config, storage.clone()).unwrap();

    pipeline.run_timetable().await.unwrap();
    let report = pipeline.run_timetable().await.unwrap();

    let changes = report.timetable_changes.unwrap();
    assert!(!changes.has_changes());
    assert!(storage.load_timetable().await.unwrap().is_some());
    assert!(!tmp.path().join("departments.json").exists());
}

#[tokio::test]
async fn test_failed_course_aborts_by_default() {
    let server = MockServer::start().await;
    mount_html(&server, "/departments", DEPARTMENTS).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH))
        .mount(&server)
        .await;
    // Only one course is served; the other one's requests 404.
    mount_course(&server, 3105).await;

    let tmp = TempDir::new().unwrap();
    let storage = Arc::new(LocalStorage::new(tmp.path()));
    let pipeline = Pipeline::new(config(&server, tmp.path()), storage).unwrap();

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(err, AppError::Collect { failed: 1, total: 2, .. }));
    assert!(!tmp.path().join("courses.json").exists());
}

#[tokio::test]
async fn test_continue_policy_keeps_partial_results() {
    let server = MockServer::start().await;
    mount_html(&server, "/departments", DEPARTMENTS).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH))
        .mount(&server)
        .await;
    mount_course(&server, 3105).await;
    Mock::given(method("POST"))
        .and(path("/timetable"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TIMETABLE))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let mut config = config(&server, tmp.path());
    config.crawler.failure_policy = FailurePolicy::Continue;
    config.crawler.max_concurrent = 1;

    let storage = Arc::new(LocalStorage::new(tmp.path()));
    let report = Pipeline::new(config, storage).unwrap().run().await.unwrap();

    assert_eq!(report.courses, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].starts_with("courses COSC"));
}

#[tokio::test]
async fn test_unsafe_department_code_stays_inside_data_dir() {
    let server = MockServer::start().await;
    let listing = DEPARTMENTS.replace(
        "</tbody>",
        "<tr><td>../../escaped</td><td>x</td><td>5</td></tr></tbody>",
    );
    mount_html(&server, "/departments", &listing).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "COSC"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH))
        .mount(&server)
        .await;
    mount_course(&server, 3105).await;
    mount_course(&server, 3110).await;
    Mock::given(method("POST"))
        .and(path("/timetable"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TIMETABLE))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let data_dir = tmp.path().join("a").join("data");
    let storage = Arc::new(LocalStorage::new(&data_dir));
    let report = Pipeline::new(config(&server, &data_dir), storage)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.departments, 1);
    assert!(!tmp.path().join("a").join("escaped.json").exists());
    assert!(data_dir.join("courses").join("cosc.json").exists());

    let departments: Departments =
        serde_json::from_slice(&std::fs::read(data_dir.join("departments.json")).unwrap())
            .unwrap();
    assert!(departments.departments.iter().all(|d| d.code == "COSC"));
}
