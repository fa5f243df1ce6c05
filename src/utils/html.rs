// src/utils/html.rs

//! Selector helpers over `scraper` documents.
//!
//! Parsed documents never cross an `.await`. Pages are parsed inside
//! synchronous helpers, and table rows are handed to concurrent units as owned
//! markup that each unit re-parses on its own.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::selector(css, format!("{e:?}")))
}

/// Concatenated text of every element under `el` matching `css`.
pub fn text_of(el: &ElementRef, css: &str) -> String {
    let Ok(sel) = Selector::parse(css) else {
        return String::new();
    };
    el.select(&sel).flat_map(|e| e.text()).collect()
}

/// Concatenated text of every element in the document matching `css`.
pub fn document_text(doc: &Html, css: &str) -> String {
    let Ok(sel) = Selector::parse(css) else {
        return String::new();
    };
    doc.select(&sel).flat_map(|e| e.text()).collect()
}

/// Attribute of the first element under `el` matching `css`.
pub fn attr_of(el: &ElementRef, css: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    el.select(&sel)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(String::from)
}

/// All elements in the document matching `css`.
pub fn select_all<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(sel) => doc.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

/// All elements under `el` matching `css`.
pub fn select_in<'a>(el: &ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(sel) => el.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

/// Outer markup of every table row matched by `row_css` in `body`.
pub fn split_rows(body: &str, row_css: &str) -> Result<Vec<String>> {
    let sel = parse_selector(row_css)?;
    let doc = Html::parse_document(body);
    Ok(doc.select(&sel).map(|row| row.html()).collect())
}

/// Re-parse one row's markup and run `f` on the `<tr>` element.
///
/// A bare `<tr>` is dropped by the HTML parser outside a table, so the row is
/// wrapped in `<table><tbody>` first.
pub fn with_row<R>(markup: &str, f: impl FnOnce(ElementRef) -> R) -> Option<R> {
    let fragment = Html::parse_fragment(&format!("<table><tbody>{markup}</tbody></table>"));
    let sel = Selector::parse("tr").ok()?;
    let row = fragment.select(&sel).next()?;
    Some(f(row))
}
