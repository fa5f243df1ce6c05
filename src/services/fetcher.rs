// src/services/fetcher.rs

//! Outbound requests to the course sources.
//!
//! The fetcher hands back owned bodies. Callers parse HTML synchronously so a
//! parsed document never lives across an `.await`.

use reqwest::Client;
use reqwest::header::COOKIE;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::TimetableForm;

/// How a page is requested.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    /// GET with a `cookie` header
    Cookie(&'a str),
    /// POST with a form-encoded body
    Form(&'a TimetableForm),
}

/// Thin wrapper around a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch an HTML page and return its body.
    ///
    /// Non-success statuses are logged and the body is still returned; the
    /// extractors degrade on whatever markup they get.
    pub async fn fetch(&self, url: &str, payload: Payload<'_>) -> Result<String> {
        let request = match payload {
            Payload::Cookie(cookie) => {
                log::debug!("GET {url}");
                self.client.get(url).header(COOKIE, cookie)
            }
            Payload::Form(form) => {
                log::debug!("POST {url}");
                self.client.post(url).form(form)
            }
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            log::warn!("{} answered {}", url, response.status());
        }
        Ok(response.text().await?)
    }

    /// GET a JSON endpoint and decode it into `T`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str, cookie: &str) -> Result<T> {
        log::debug!("GET {url} (json)");
        let response = self.client.get(url).header(COOKIE, cookie).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::status(url, status.as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
