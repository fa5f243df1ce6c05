//! Local filesystem storage implementation.
//!
//! Artifacts are pretty-printed with one tab of indent and written
//! atomically: the bytes land in a sibling temp file that is then renamed
//! over the target, so a reader never sees a half-written file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{Course, Departments, Offerings, Timetable};
use crate::storage::{
    COURSES_KEY, CatalogStorage, DEPARTMENTS_KEY, TIMETABLE_KEY, check_key, offerings_key,
};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        check_key(key)?;
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data with tab indentation.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = to_tab_json(value)?;
        self.write_bytes(key, &bytes).await?;
        log::info!("Wrote {}", self.path(key).display());
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        check_key(key)?;
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

fn to_tab_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut ser = Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    Ok(bytes)
}

#[async_trait]
impl CatalogStorage for LocalStorage {
    async fn write_departments(&self, departments: &Departments) -> Result<()> {
        self.write_json(DEPARTMENTS_KEY, departments).await
    }

    async fn write_offerings(&self, offerings: &Offerings) -> Result<()> {
        self.write_json(&offerings_key(&offerings.department), offerings)
            .await
    }

    async fn write_courses(&self, courses: &[Course]) -> Result<()> {
        self.write_json(COURSES_KEY, courses).await
    }

    async fn write_timetable(&self, timetable: &Timetable) -> Result<()> {
        self.write_json(TIMETABLE_KEY, timetable).await
    }

    async fn load_timetable(&self) -> Result<Option<Timetable>> {
        self.read_json(TIMETABLE_KEY).await
    }

    async fn read_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.read_bytes(key).await
    }
}
