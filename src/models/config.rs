//! Application configuration structures.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote sources and credentials
    #[serde(default)]
    pub sources: SourceConfig,

    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Inbound HTTP API settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Where JSON artifacts are written
    #[serde(default)]
    pub storage: StorageConfig,

    /// Form payload posted to the timetable
    #[serde(default)]
    pub timetable: TimetableForm,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (`LAYUP_URL`, `LAYUP_COOKIE`,
    /// `ORC_URL`, `PORT`, `DATA_DIR`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("LAYUP_URL") {
            self.sources.layup_url = v;
        }
        if let Some(v) = get("LAYUP_COOKIE") {
            self.sources.layup_cookie = v;
        }
        if let Some(v) = get("ORC_URL") {
            self.sources.orc_url = v;
        }
        if let Some(v) = get("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("PORT") {
            let port = v
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("PORT is not a valid port: {v}")))?;
            self.server.port = Some(port);
        }
        Ok(())
    }

    /// Validate everything a full scrape needs.
    pub fn validate(&self) -> Result<()> {
        if self.sources.layup_url.trim().is_empty() {
            return Err(AppError::config("LAYUP_URL must be set"));
        }
        if self.sources.layup_cookie.trim().is_empty() {
            return Err(AppError::config("LAYUP_COOKIE must be set"));
        }
        Url::parse(&self.sources.layup_url)?;
        self.validate_timetable()?;
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        Ok(())
    }

    /// Validate what the timetable stage alone needs.
    pub fn validate_timetable(&self) -> Result<()> {
        if self.sources.orc_url.trim().is_empty() {
            return Err(AppError::config("ORC_URL must be set"));
        }
        Url::parse(&self.sources.orc_url)?;
        Ok(())
    }
}

/// Remote source locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Layup List base URL, e.g. `https://www.layuplist.com`
    #[serde(default)]
    pub layup_url: String,

    /// Session cookie sent with every Layup List request
    #[serde(default)]
    pub layup_cookie: String,

    /// Timetable search endpoint
    #[serde(default)]
    pub orc_url: String,

    /// Links containing this prefix are taken as a course's catalog page
    #[serde(default = "defaults::catalog_prefix")]
    pub catalog_prefix: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            layup_url: String::new(),
            layup_cookie: String::new(),
            orc_url: String::new(),
            catalog_prefix: defaults::catalog_prefix(),
        }
    }
}

/// What to do when some units of a stage fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole run after the stage drains
    #[default]
    Abort,
    /// Log the failures and keep the values that did arrive
    Continue,
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds (0 disables the timeout)
    #[serde(default)]
    pub timeout_secs: u64,

    /// Maximum live units per stage (0 means one per item)
    #[serde(default)]
    pub max_concurrent: usize,

    /// Failure handling for collection stages
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: 0,
            max_concurrent: 0,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Inbound HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default)]
    pub port: Option<u16>,
}

impl ServerConfig {
    /// Socket address to bind; fails when no port is configured.
    pub fn addr(&self) -> Result<SocketAddr> {
        let port = self
            .port
            .ok_or_else(|| AppError::config("PORT must be set"))?;
        format!("{}:{}", self.host, port)
            .parse()
            .map_err(|e| AppError::config(format!("Invalid listen address: {e}")))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: None,
        }
    }
}

/// Artifact storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
        }
    }
}

/// Search form posted to the timetable. Field names are the form keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableForm {
    pub distribradio: String,
    pub depts: String,
    pub periods: String,
    pub distribs: String,
    pub distribs_i: String,
    pub distribs_wc: String,
    pub pmode: String,
    pub term: String,
    pub levl: String,
    pub fys: String,
    pub wrt: String,
    pub pe: String,
    pub review: String,
    pub crnl: String,
    pub classyear: String,
    pub termradio: String,
    pub terms: String,
    pub subjectradio: String,
    pub hoursradio: String,
    pub sortorder: String,
    pub searchtype: String,
}

impl Default for TimetableForm {
    fn default() -> Self {
        let none = || "no_value".to_string();
        Self {
            distribradio: "alldistribs".into(),
            depts: none(),
            periods: none(),
            distribs: none(),
            distribs_i: none(),
            distribs_wc: none(),
            pmode: "public".into(),
            term: String::new(),
            levl: String::new(),
            fys: "n".into(),
            wrt: "n".into(),
            pe: "n".into(),
            review: "n".into(),
            crnl: none(),
            classyear: "2008".into(),
            termradio: "allterms".into(),
            terms: none(),
            subjectradio: "allsubjects".into(),
            hoursradio: "allhours".into(),
            sortorder: "dept".into(),
            searchtype: "Subject Area(s)".into(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; course-crawler/0.1)".into()
    }
    pub fn catalog_prefix() -> String {
        "http://dartmouth.smartcatalogiq.com/en/current/orc/".into()
    }
    pub fn host() -> String {
        "0.0.0.0".into()
    }
    pub fn data_dir() -> PathBuf {
        PathBuf::from("data")
    }
}
