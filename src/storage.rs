//! Documents store.
//!
//! Rendered files live in one flat directory and are looked up purely by
//! file name. Names come from [`document_filename`], which makes them
//! unique per generation.

use async_trait::async_trait;
use log::warn;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

use crate::formatter::common::sanitize_filename;

const DOCUMENT_EXTENSION: &str = "pdf";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document '{0}' already exists")]
    AlreadyExists(String),
    #[error("'{0}' is not a valid document name")]
    InvalidName(String),
    #[error("document storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document. Existing names are never overwritten.
    async fn save(&self, filename: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Load a document, `None` when no document has that name.
    async fn load(&self, filename: &str) -> Result<Option<Vec<u8>>, StorageError>;
}

/// `{documentType}_{8 hex chars}.pdf`, with the type reduced to a safe slug.
pub fn document_filename(document_type: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}.{}",
        sanitize_filename(document_type, "document"),
        &token[..8],
        DOCUMENT_EXTENSION
    )
}

/// True when `filename` is a bare file name that cannot escape the store.
pub fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && ::sanitize_filename::sanitize(filename) == filename
        && !filename.contains(['/', '\\'])
}

/// Store backed by a directory on the local filesystem.
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    /// Open the store, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf, StorageError> {
        if !is_plain_filename(filename) {
            return Err(StorageError::InvalidName(filename.to_string()));
        }
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn save(&self, filename: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(filename)?;
        let file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(filename.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        write_or_discard(file, &path, data).await
    }

    async fn load(&self, filename: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(filename)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write `data` to a freshly created file. On failure the partial file is
/// removed so it can never be served.
async fn write_or_discard<W>(mut file: W, path: &Path, data: &[u8]) -> Result<(), StorageError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        file.write_all(data).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(file);
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            warn!(
                "Failed to remove partial document {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(e.into());
    }
    Ok(())
}
