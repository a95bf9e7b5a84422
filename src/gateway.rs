//! Secure Access Gateway
//!
//! Validation and orchestration layer in front of the cache engine. Every
//! read and write is checked against the security perimeter (root
//! confinement, extension allow-list, size ceiling) before any disk I/O
//! happens; reads are served read-through, populating the cache on a miss.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::cache::{normalize_key, CacheEngine, CacheStats};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::fs::{FileMeta, FileSystem};

// == Batch Outcome ==
/// Result of a batch read: successful content per path plus the failures
/// that were isolated from the rest of the batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub contents: HashMap<String, Arc<str>>,
    pub errors: Vec<BatchError>,
}

/// A single failed path within a batch read.
#[derive(Debug)]
pub struct BatchError {
    pub path: String,
    pub error: CacheError,
}

// == Secure Access Gateway ==
/// Mediates all file access for cache consumers.
///
/// Requested paths are always interpreted relative to the configured root;
/// both `/` and `\` act as separators, and any `..` that would climb above
/// the root is rejected before the filesystem is consulted.
///
/// Clones share the same engine and filesystem handles, so a gateway can be
/// handed to many callers cheaply.
#[derive(Clone)]
pub struct SecureAccessGateway {
    root: PathBuf,
    config: CacheConfig,
    engine: Arc<RwLock<CacheEngine>>,
    fs: Arc<dyn FileSystem>,
}

impl SecureAccessGateway {
    // == Constructor ==
    /// Creates a gateway rooted at `root`.
    ///
    /// Fails with `InvalidConfig` if the configuration is inconsistent.
    pub fn new(
        root: impl Into<PathBuf>,
        config: CacheConfig,
        engine: Arc<RwLock<CacheEngine>>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            root: root.into(),
            config,
            engine,
            fs,
        })
    }

    // == Read ==
    /// Validates `path` and returns its content, from cache when possible.
    ///
    /// On a cache miss the file is read from disk and handed to the engine;
    /// a declined `put` never fails the read, the caller still gets the
    /// content.
    pub async fn read(&self, path: &str) -> Result<Arc<str>> {
        let resolved = self.resolve(path)?;
        self.check_extension(path)?;
        let meta = self.stat_validated(path, &resolved).await?;

        let key = normalize_key(path);
        {
            let mut engine = self.engine.write().await;
            if let Some(content) = engine.get(&key, meta.modified) {
                return Ok(content);
            }
        }

        let content: Arc<str> = self
            .fs
            .read(&resolved)
            .await
            .map_err(|e| Self::map_io(path, e))?
            .into();

        let mut engine = self.engine.write().await;
        if !engine.put(key, resolved, Arc::clone(&content), meta.modified) {
            debug!(path, "content declined by cache, serving uncached");
        }
        Ok(content)
    }

    // == Write ==
    /// Validates `path`, writes `content`, and invalidates the cache entry
    /// so the next read reflects the new content.
    ///
    /// The size ceiling applies to the new content; the parent directory
    /// chain is created if missing.
    pub async fn write(&self, path: &str, content: &str) -> Result<()> {
        let resolved = self.resolve(path)?;
        self.check_extension(path)?;
        if content.len() > self.config.max_file_size {
            return Err(CacheError::FileTooLarge {
                path: path.to_string(),
                size: content.len() as u64,
                max: self.config.max_file_size as u64,
            });
        }

        if let Some(parent) = resolved.parent() {
            self.fs.create_dir_all(parent).await?;
        }
        self.fs.write(&resolved, content).await?;

        self.engine.write().await.invalidate(&normalize_key(path));
        Ok(())
    }

    // == Batch Read ==
    /// Reads many paths through a bounded worker pool.
    ///
    /// In-flight reads are capped at `read_concurrency`; a failure on one
    /// path is collected and never aborts the rest of the batch. Result
    /// ordering is irrelevant since content is keyed by path.
    pub async fn read_many(&self, paths: &[String]) -> BatchOutcome {
        let semaphore = Arc::new(Semaphore::new(self.config.read_concurrency));
        let mut join_set = JoinSet::new();

        for path in paths {
            // acquire before spawn so submission itself respects the cap
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let gateway = self.clone();
            let path = path.clone();
            join_set.spawn(async move {
                let _permit = permit;
                let result = gateway.read(&path).await;
                (path, result)
            });
        }

        let mut outcome = BatchOutcome::default();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((path, Ok(content))) => {
                    outcome.contents.insert(path, content);
                }
                Ok((path, Err(error))) => {
                    outcome.errors.push(BatchError { path, error });
                }
                Err(join_error) => {
                    warn!(%join_error, "batch read worker failed");
                }
            }
        }

        if !outcome.errors.is_empty() {
            warn!(
                failed = outcome.errors.len(),
                total = paths.len(),
                "batch read completed with failures"
            );
        }
        outcome
    }

    // == Invalidate ==
    /// Drops the cache entry for `path`; returns whether one was present.
    pub async fn invalidate(&self, path: &str) -> bool {
        self.engine.write().await.invalidate(&normalize_key(path))
    }

    // == Exists ==
    /// Whether `path` resolves inside the root and exists on disk.
    pub async fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(resolved) => self.fs.exists(&resolved).await,
            Err(_) => false,
        }
    }

    // == Stats ==
    /// Snapshot of the cache counters and aggregates.
    pub async fn stats(&self) -> CacheStats {
        self.engine.read().await.stats()
    }

    // == Clear ==
    /// Empties the cache; cumulative counters are preserved.
    pub async fn clear_cache(&self) {
        self.engine.write().await.clear();
    }

    /// Resolves a requested path lexically against the root.
    ///
    /// Pure string work, no filesystem access: `..` segments pop resolved
    /// components and fail the call once they would climb above the root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        let mut depth = 0usize;
        for segment in path.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    if depth == 0 {
                        return Err(CacheError::PathTraversal(path.to_string()));
                    }
                    depth -= 1;
                    resolved.pop();
                }
                segment => {
                    resolved.push(segment);
                    depth += 1;
                }
            }
        }
        Ok(resolved)
    }

    /// Checks the extension allow-list; extensionless files always pass.
    fn check_extension(&self, path: &str) -> Result<()> {
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if extension.is_empty() || self.config.allowed_extensions.contains(&extension) {
            Ok(())
        } else {
            Err(CacheError::ExtensionNotAllowed {
                path: path.to_string(),
                extension,
            })
        }
    }

    /// Stats the file and enforces the size ceiling before any content is
    /// read into memory.
    async fn stat_validated(&self, path: &str, resolved: &Path) -> Result<FileMeta> {
        let meta = self
            .fs
            .stat(resolved)
            .await
            .map_err(|e| Self::map_io(path, e))?;
        if meta.len > self.config.max_file_size as u64 {
            return Err(CacheError::FileTooLarge {
                path: path.to_string(),
                size: meta.len,
                max: self.config.max_file_size as u64,
            });
        }
        Ok(meta)
    }

    /// Keeps NotFound distinct so optional-file callers can skip.
    fn map_io(path: &str, err: io::Error) -> CacheError {
        if err.kind() == io::ErrorKind::NotFound {
            CacheError::NotFound(path.to_string())
        } else {
            CacheError::Io(err)
        }
    }
}
