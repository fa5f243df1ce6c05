//! Mocked Layup List and ORC sources shared by the integration tests.

#![allow(dead_code)]

use std::path::Path;

use course_crawler::models::Config;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const COOKIE: &str = "sessionid=test";

pub const DEPARTMENTS: &str = r#"
    <table><tbody>
      <tr><td>COSC</td><td>Computer Science</td><td>2</td></tr>
      <tr><td>COCO</td><td>College Courses</td><td>1</td></tr>
    </tbody></table>
"#;

pub const SEARCH: &str = r#"
    <table><tbody>
      <tr onclick="window.document.location='/course/3105'">
        <td>COSC001: Introduction to Programming and Computation</td>
        <td>Offered 24F</td><td>TLA</td><td>214</td><td>12</td><td>3</td>
      </tr>
      <tr onclick="window.document.location='/course/3110'">
        <td>COSC010: Problem Solving via Object-Oriented Programming</td>
        <td></td><td></td><td>98</td><td>4</td><td>7</td>
      </tr>
    </tbody></table>
"#;

pub const DETAIL: &str = r#"
    <html><body>
      <div><div>
        <h1>course</h1>
        <h4>Offered (24F, 25W)</h4>
        <p>An introduction to programming.</p>
      </div></div>
      <p>Crosslisted with <a href="/course/4001">ENGS 020</a></p>
      <a href="http://dartmouth.smartcatalogiq.com/en/current/orc/cosc/1">ORC</a>
      <table>
        <tr onclick="window.document.location='/course/3110'"><td>COSC010</td></tr>
      </table>
    </body></html>
"#;

pub const REVIEWS: &str = r#"
    <table>
      <tr><td>24F with Smith:</td><td>Loved it.</td></tr>
    </table>
"#;

pub const TIMETABLE: &str = r#"
    <div class="data-table"><table><tbody>
      <tr>
        <td>202409</td><td>91234</td><td><a href="/cosc">COSC</a></td><td>001</td>
        <td>01</td><td>N</td><td></td><td><a href="/cosc/1">Intro</a></td><td></td>
        <td></td><td>10</td><td>102</td><td>Sudikoff</td><td>Ada Lovelace</td>
        <td></td><td></td><td>90</td><td>87</td><td>IP</td><td></td>
      </tr>
      <tr><td colspan="20">Legend</td></tr>
    </tbody></table></div>
"#;

pub async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("cookie", COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_course(server: &MockServer, id: i64) {
    mount_html(server, &format!("/course/{id}"), DETAIL).await;
    mount_html(server, &format!("/course/{id}/review_search"), REVIEWS).await;

    Mock::given(method("GET"))
        .and(path(format!("/api/course/{id}/medians")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "medians": [{
                "term": "24F",
                "avg_numeric_value": 3.67,
                "courses": [
                    {"median": "A-", "section": 1, "numeric_value": 3.67, "enrollment": 40}
                ]
            }]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/course/{id}/professors")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "professors": ["Ada Lovelace"]
        })))
        .mount(server)
        .await;
}

pub async fn mock_sources() -> MockServer {
    let server = MockServer::start().await;

    mount_html(&server, "/departments", DEPARTMENTS).await;
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

    server
}

/// Config pointing every source at `server`.
pub fn config(server: &MockServer, data_dir: &Path) -> Config {
    let mut config = Config::default();
    config.sources.layup_url = server.uri();
    config.sources.layup_cookie = COOKIE.to_string();
    config.sources.orc_url = format!("{}/timetable", server.uri());
    config.storage.data_dir = data_dir.to_path_buf();
    config
}
