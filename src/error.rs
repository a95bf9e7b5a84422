//! Error types for the file cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache and gateway operations.
///
/// Validation failures (`PathTraversal`, `ExtensionNotAllowed`,
/// `FileTooLarge`) indicate a caller bug or an access attempt outside the
/// configured perimeter and are surfaced immediately. `NotFound` is kept
/// distinct from other I/O failures so callers reading optional files can
/// treat it as "absent" instead of an error.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Requested path escapes the configured root directory
    #[error("Path traversal attempt: {0}")]
    PathTraversal(String),

    /// File extension is not in the configured allow-list
    #[error("Extension '.{extension}' not allowed: {path}")]
    ExtensionNotAllowed { path: String, extension: String },

    /// File exceeds the configured size ceiling
    #[error("File too large: {path} ({size} bytes > {max} bytes)")]
    FileTooLarge { path: String, size: u64, max: u64 },

    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Generic read/write failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the file cache.
pub type Result<T> = std::result::Result<T, CacheError>;
