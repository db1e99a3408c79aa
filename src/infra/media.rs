//! Image storage on the local filesystem.
//!
//! Files land under `<base>/<category>/<ref_id>/<uuid>.<ext>` and are served
//! back at `/media/<category>/<ref_id>/<uuid>.<ext>`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use strum_macros::{AsRefStr, Display};
use uuid::Uuid;

use crate::config::{ALLOWED_IMAGE_EXTENSIONS, MEDIA_URL_PREFIX};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Top-level media directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ImageCategory {
    Pets,
    Users,
    Reservations,
    Article,
    Diseases,
}

/// Media storage port.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store an upload and return its relative `/media/...` URL.
    ///
    /// Fails with `Validation` for an empty file or an extension outside
    /// `ALLOWED_IMAGE_EXTENSIONS`.
    async fn save(
        &self,
        category: ImageCategory,
        ref_id: i64,
        file_name: String,
        bytes: Vec<u8>,
    ) -> AppResult<String>;

    /// Remove a stored file by its relative URL.
    ///
    /// Returns false without touching the filesystem when `url` does not
    /// start with `/media/`, and false when nothing was removed.
    async fn delete_by_url(&self, url: &str) -> bool;
}

/// Filesystem-backed MediaStore
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a relative URL to a path under the base directory.
    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let relative = Path::new(url.strip_prefix(MEDIA_URL_PREFIX)?);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.base_path.join(relative))
    }
}

/// Lower-cased extension of `file_name`, empty when there is none.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

#[async_trait]
impl MediaStore for FileStorage {
    async fn save(
        &self,
        category: ImageCategory,
        ref_id: i64,
        file_name: String,
        bytes: Vec<u8>,
    ) -> AppResult<String> {
        if ref_id < 1 {
            return Err(AppError::validation("refId is required"));
        }
        if bytes.is_empty() {
            return Err(AppError::validation("file is empty"));
        }

        let ext = extension_of(&file_name);
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::validation(format!(
                "unsupported file type: '{}'",
                ext
            )));
        }

        let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
        let dir = self
            .base_path
            .join(category.as_ref())
            .join(ref_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&stored_name), &bytes).await?;

        tracing::debug!(%category, ref_id, file = %stored_name, size = bytes.len(), "Image stored");

        Ok(format!(
            "{}{}/{}/{}",
            MEDIA_URL_PREFIX, category, ref_id, stored_name
        ))
    }

    async fn delete_by_url(&self, url: &str) -> bool {
        let Some(path) = self.resolve(url) else {
            return false;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete image");
                false
            }
        }
    }
}
