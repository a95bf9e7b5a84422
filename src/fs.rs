//! Filesystem Abstraction
//!
//! All disk access goes through the `FileSystem` trait so the gateway can be
//! exercised against an in-memory filesystem in tests, with full control
//! over modification times.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

// == File Metadata ==
/// The metadata subset the cache needs from a `stat`.
#[derive(Debug, Clone, Copy)]
pub struct FileMeta {
    /// On-disk size in bytes
    pub len: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

// == FileSystem Trait ==
/// Async filesystem operations used by the gateway.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Returns size and modification time without reading content.
    async fn stat(&self, path: &Path) -> io::Result<FileMeta>;

    /// Reads the whole file as UTF-8 text.
    async fn read(&self, path: &Path) -> io::Result<String>;

    /// Writes `content`, replacing the file if it exists.
    async fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Creates the directory and any missing ancestors.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Whether the path exists.
    async fn exists(&self, path: &Path) -> bool;
}

// == OS Implementation ==
/// Production implementation backed by `tokio::fs`.
#[derive(Debug, Default)]
pub struct OsFileSystem;

#[async_trait]
impl FileSystem for OsFileSystem {
    async fn stat(&self, path: &Path) -> io::Result<FileMeta> {
        let meta = tokio::fs::metadata(path).await?;
        let modified = meta.modified()?;
        Ok(FileMeta {
            len: meta.len(),
            modified: modified.into(),
        })
    }

    async fn read(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        tokio::fs::write(path, content).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}
