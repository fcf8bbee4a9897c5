//! Upload Storage
//!
//! Files land under a single root directory (`UPLOAD_DIR`) which the API
//! serves statically at `/uploads`. Stored files are addressed by their
//! public `src`, e.g. `uploads/files/user-42/profile-42-1700000000000.png`.

use std::io;
use std::path::{Component, Path, PathBuf};

use nid::Nanoid;
use thiserror::Error;

/// Prefix of every public `src` produced by the store
pub const PUBLIC_PREFIX: &str = "uploads";

/// Accepted image MIME types
pub const IMAGE_MIME_TYPES: &[&str] = &[
    "image/jpg",
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/svg",
    "image/svg+xml",
    "image/heif",
];

pub fn is_image_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    IMAGE_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(essence))
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A file written by [`UploadStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Public path, relative to the site root
    pub src: String,
    /// Location on disk
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` under a generated name, keeping the original extension
    pub async fn save(
        &self,
        subdir: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, StorageError> {
        let file_name = format!("{}{}", Nanoid::<21>::new().as_str(), extension_of(original_name));
        self.save_named(subdir, &file_name, bytes).await
    }

    /// Store `bytes` as `subdir/file_name`, overwriting an existing file
    pub async fn save_named(
        &self,
        subdir: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, StorageError> {
        let relative = Path::new(subdir).join(file_name);
        ensure_relative(&relative)?;

        let path = self.root.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        let src = format!("{}/{}/{}", PUBLIC_PREFIX, subdir.trim_matches('/'), file_name);
        tracing::debug!(src = %src, size = bytes.len(), "Upload stored");

        Ok(StoredFile { src, path })
    }

    /// Remove a stored file by its public `src`
    ///
    /// Remote URLs (OAuth profile pictures) and files already gone are
    /// ignored; other failures are logged and swallowed.
    pub async fn remove(&self, src: &str) {
        let Some(relative) = src
            .strip_prefix(PUBLIC_PREFIX)
            .map(|rest| rest.trim_start_matches('/'))
        else {
            return;
        };

        if ensure_relative(Path::new(relative)).is_err() {
            tracing::warn!(src = %src, "Refusing to remove file outside upload root");
            return;
        }

        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => tracing::debug!(src = %src, "Upload removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(src = %src, error = %e, "Failed to remove upload"),
        }
    }
}

/// `.png` for `photo.PNG`, empty when there is no usable extension
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn ensure_relative(path: &Path) -> Result<(), StorageError> {
    let only_normal = path
        .components()
        .all(|component| matches!(component, Component::Normal(_)));

    if only_normal && path.components().next().is_some() {
        Ok(())
    } else {
        Err(StorageError::InvalidPath(path.display().to_string()))
    }
}
