// src/utils/url.rs

//! URL building for source endpoints.

use url::Url;

use crate::error::Result;

/// Join a base URL and a path, keeping any path prefix on the base.
///
/// # Examples
/// ```
/// use course_crawler::utils::url::endpoint;
///
/// assert_eq!(
///     endpoint("https://www.layuplist.com/", "/departments").unwrap(),
///     "https://www.layuplist.com/departments"
/// );
/// ```
pub fn endpoint(base: &str, path: &str) -> Result<String> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Ok(Url::parse(&joined)?.to_string())
}

/// Like [`endpoint`], with URL-encoded query parameters.
pub fn endpoint_with_query(base: &str, path: &str, params: &[(&str, &str)]) -> Result<String> {
    let mut url = Url::parse(&endpoint(base, path)?)?;
    url.query_pairs_mut().extend_pairs(params);
    Ok(url.to_string())
}

/// Layup List page for a course.
pub fn course_page(layup_url: &str, id: i64) -> Result<String> {
    endpoint(layup_url, &format!("course/{id}"))
}

/// Layup List JSON sub-resource for a course, e.g. `medians`.
pub fn course_api(layup_url: &str, id: i64, resource: &str) -> Result<String> {
    endpoint(layup_url, &format!("api/course/{id}/{resource}"))
}
