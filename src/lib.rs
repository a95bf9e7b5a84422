//! filecache - A secured read-through file content cache
//!
//! Serves file content to many independent callers while avoiding repeated
//! disk I/O for unchanged files, bounding memory under byte and entry
//! budgets, detecting stale or corrupted entries, and enforcing a security
//! perimeter (root confinement, extension allow-listing, size ceilings)
//! before any byte reaches a caller.
//!
//! # Wiring
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio::sync::RwLock;
//! use filecache::{CacheConfig, CacheEngine, OsFileSystem, SecureAccessGateway, spawn_expiry_task};
//!
//! # async fn wire() -> filecache::Result<()> {
//! let config = CacheConfig::default();
//! let engine = Arc::new(RwLock::new(CacheEngine::new(&config)));
//! let sweep = spawn_expiry_task(Arc::clone(&engine), config.sweep_interval);
//!
//! let gateway = SecureAccessGateway::new(
//!     "/path/to/project",
//!     config,
//!     engine,
//!     Arc::new(OsFileSystem),
//! )?;
//!
//! let content = gateway.read("src/main.rs").await?;
//! # drop(content);
//! // on shutdown
//! sweep.abort();
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fs;
pub mod gateway;
pub mod tasks;

pub use cache::{CacheEngine, CacheStats, IntegrityStore};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use fs::{FileMeta, FileSystem, OsFileSystem};
pub use gateway::{BatchError, BatchOutcome, SecureAccessGateway};
pub use tasks::spawn_expiry_task;
