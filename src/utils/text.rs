// src/utils/text.rs

//! Text cleanup and cross-reference parsing for scraped fields.
//!
//! Everything here is infallible: unparsable input degrades to `None`,
//! an empty string, or `0.0`.

use std::sync::LazyLock;

use regex::Regex;

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static COURSE_PATH: Pattern = LazyLock::new(|| Regex::new(r"/course/(\d+)"));
static QUOTED_COURSE_PATH: Pattern = LazyLock::new(|| Regex::new(r"'/course/(\d+)'"));
static LOCATION_ONCLICK: Pattern =
    LazyLock::new(|| Regex::new(r"window\.document\.location='/course/(\d+)'"));
static DECIMAL: Pattern = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?|\.\d+"));
static LETTERS: Pattern = LazyLock::new(|| Regex::new(r"[A-Za-z]+"));
static PARENTHESISED: Pattern = LazyLock::new(|| Regex::new(r"\(([^)]+)\)"));
static OR_SEPARATOR: Pattern = LazyLock::new(|| Regex::new(r"\s+or\s+"));
static JS_CALL: Pattern =
    LazyLock::new(|| Regex::new(r"^\s*javascript:[\w.]+\(\s*'(.*)'\s*\)\s*;?\s*$"));

fn capture_id(pattern: &Pattern, text: &str) -> Option<i64> {
    let re = pattern.as_ref().ok()?;
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Layup List ID in a cross-listing link.
///
/// Review-search links point at the current course, not a cross-listing.
pub fn resolve_cross_listing_id(text: &str) -> Option<i64> {
    if text.contains("review_search") {
        return None;
    }
    capture_id(&COURSE_PATH, text)
}

/// Layup List ID in a similar-course row handler (`'/course/<id>'`).
pub fn resolve_similar_course_id(text: &str) -> Option<i64> {
    capture_id(&QUOTED_COURSE_PATH, text)
}

/// Layup List ID in a search-result row handler.
pub fn resolve_offering_id(onclick: &str) -> Option<i64> {
    capture_id(&LOCATION_ONCLICK, onclick)
}

/// Everything after the first colon, trimmed.
///
/// `"ANTH001: Introduction to Anthropology"` → `"Introduction to Anthropology"`
pub fn strip_dept_prefix(title: &str) -> String {
    title
        .split_once(':')
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

/// The department segment of a title: everything before the first colon.
pub fn dept_segment(title: &str) -> &str {
    title.split(':').next().unwrap_or_default().trim()
}

/// First decimal number in the text, or `0.0`.
pub fn first_decimal_number(text: &str) -> f64 {
    DECIMAL
        .as_ref()
        .ok()
        .and_then(|re| re.find(text))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// Department of a cross-listing entry: the first run of letters.
pub fn cross_list_dept(text: &str) -> String {
    LETTERS
        .as_ref()
        .ok()
        .and_then(|re| re.find(text))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Contents of the first parenthesised group.
pub fn parenthesised(text: &str) -> Option<&str> {
    let re = PARENTHESISED.as_ref().ok()?;
    Some(re.captures(text)?.get(1)?.as_str())
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comma-separated list; `None` when nothing is left after trimming.
pub fn comma_list(text: &str) -> Option<Vec<String>> {
    non_empty(text.split(','))
}

/// List joined by the word "or", e.g. `"LIT or ART"`.
pub fn or_list(text: &str) -> Option<Vec<String>> {
    let text = text.trim();
    match OR_SEPARATOR.as_ref() {
        Ok(re) => non_empty(re.split(text)),
        Err(_) => non_empty(std::iter::once(text)),
    }
}

fn non_empty<'a>(parts: impl Iterator<Item = &'a str>) -> Option<Vec<String>> {
    let items: Vec<String> = parts
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    (!items.is_empty()).then_some(items)
}

/// Unwrap `javascript:fn('<inner>')` links to `<inner>`.
pub fn unwrap_js_link(href: &str) -> String {
    JS_CALL
        .as_ref()
        .ok()
        .and_then(|re| re.captures(href))
        .and_then(|caps| caps.get(1))
        .map_or_else(|| href.trim(), |m| m.as_str())
        .to_string()
}

/// Lenient integer parse; anything unparsable is zero.
pub fn parse_int<T: std::str::FromStr + Default>(text: &str) -> T {
    text.trim().parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_listing_id() {
        assert_eq!(
            resolve_cross_listing_id("window.document.location='/course/1234'"),
            Some(1234)
        );
        assert_eq!(resolve_cross_listing_id("/course/88"), Some(88));
        assert_eq!(
            resolve_cross_listing_id("/course/1234/review_search?q=great"),
            None
        );
        assert_eq!(resolve_cross_listing_id("...review_search?q=..."), None);
        assert_eq!(resolve_cross_listing_id("/departments"), None);
    }

    #[test]
    fn test_similar_course_id() {
        assert_eq!(
            resolve_similar_course_id("window.document.location='/course/42'"),
            Some(42)
        );
        assert_eq!(
            resolve_similar_course_id("window.document.location='/course/42/review_search?q=x'"),
            None
        );
        assert_eq!(resolve_similar_course_id(""), None);
    }

    #[test]
    fn test_offering_id() {
        assert_eq!(
            resolve_offering_id("window.document.location='/course/3105'"),
            Some(3105)
        );
        assert_eq!(resolve_offering_id("location='/course/3105'"), None);
    }

    #[test]
    fn test_strip_dept_prefix() {
        assert_eq!(
            strip_dept_prefix("ANTH001: Introduction to Anthropology"),
            "Introduction to Anthropology"
        );
        assert_eq!(strip_dept_prefix("COSC010: Data: Structures "), "Data: Structures");
        assert_eq!(strip_dept_prefix("No colon here"), "");
    }

    #[test]
    fn test_first_decimal_number() {
        assert_eq!(first_decimal_number("ANTH001: Introduction"), 1.0);
        assert_eq!(first_decimal_number("COSC010.05"), 10.05);
        assert_eq!(first_decimal_number(dept_segment("MATH 3: Calculus 101")), 3.0);
        assert_eq!(first_decimal_number("none"), 0.0);
    }

    #[test]
    fn test_cross_list_dept() {
        assert_eq!(cross_list_dept(" AMES 015"), "AMES");
        assert_eq!(cross_list_dept("015"), "");
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            comma_list(" SOC, CI ,"),
            Some(vec!["SOC".to_string(), "CI".to_string()])
        );
        assert_eq!(comma_list("   "), None);
        assert_eq!(
            or_list("LIT or ART"),
            Some(vec!["LIT".to_string(), "ART".to_string()])
        );
        assert_eq!(or_list("TMV"), Some(vec!["TMV".to_string()]));
        assert_eq!(or_list(""), None);
    }

    #[test]
    fn test_parenthesised() {
        assert_eq!(parenthesised("Offered (10A, 2A)"), Some("10A, 2A"));
        assert_eq!(parenthesised("Offered"), None);
    }

    #[test]
    fn test_unwrap_js_link() {
        assert_eq!(
            unwrap_js_link("javascript:reqmat_window('https://example.edu/books?crn=1')"),
            "https://example.edu/books?crn=1"
        );
        assert_eq!(unwrap_js_link(" https://plain.example.edu "), "https://plain.example.edu");
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int::<u32>(" 42 "), 42);
        assert_eq!(parse_int::<u32>("n/a"), 0);
        assert_eq!(parse_int::<i32>("-3"), -3);
    }
}
