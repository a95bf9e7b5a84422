//! Configuration Module
//!
//! Explicit cache configuration with defaults and environment overrides.

use std::collections::HashSet;
use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache and gateway configuration parameters.
///
/// Every option has a default; values can also be overridden via
/// `FILECACHE_`-prefixed environment variables.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Hard memory budget for cached content, in bytes
    pub max_memory_usage: usize,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Per-file size ceiling, in bytes
    pub max_file_size: usize,
    /// Maximum idle time before an entry is expired by the sweep
    pub ttl: Duration,
    /// Whether cached content is re-fingerprinted on every hit
    pub integrity_check_enabled: bool,
    /// File extensions the gateway will serve (lowercase, without the dot);
    /// extensionless files are always permitted
    pub allowed_extensions: HashSet<String>,
    /// Concurrency limit for batch reads
    pub read_concurrency: usize,
    /// Interval between background expiry sweeps
    pub sweep_interval: Duration,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `FILECACHE_MAX_MEMORY_USAGE` - Memory budget in bytes (default: 256 MiB)
    /// - `FILECACHE_MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `FILECACHE_MAX_FILE_SIZE` - Per-file ceiling in bytes (default: 10 MiB)
    /// - `FILECACHE_TTL_SECS` - Idle expiry in seconds (default: 1800)
    /// - `FILECACHE_INTEGRITY_CHECK` - Enable fingerprint checks (default: true)
    /// - `FILECACHE_READ_CONCURRENCY` - Batch read fan-out limit (default: 10)
    /// - `FILECACHE_SWEEP_INTERVAL_SECS` - Expiry sweep interval (default: 300)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_memory_usage: env::var("FILECACHE_MAX_MEMORY_USAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_memory_usage),
            max_entries: env::var("FILECACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
            max_file_size: env::var("FILECACHE_MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_file_size),
            ttl: env::var("FILECACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl),
            integrity_check_enabled: env::var("FILECACHE_INTEGRITY_CHECK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.integrity_check_enabled),
            allowed_extensions: defaults.allowed_extensions,
            read_concurrency: env::var("FILECACHE_READ_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.read_concurrency),
            sweep_interval: env::var("FILECACHE_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Checks inter-field constraints.
    ///
    /// A zero budget would make every `put` evict forever, and a file ceiling
    /// above the memory budget would admit entries that can never fit.
    pub fn validate(&self) -> Result<()> {
        if self.max_memory_usage == 0 {
            return Err(CacheError::InvalidConfig(
                "max_memory_usage must be greater than zero".to_string(),
            ));
        }
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        if self.max_file_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_file_size must be greater than zero".to_string(),
            ));
        }
        if self.max_file_size > self.max_memory_usage {
            return Err(CacheError::InvalidConfig(format!(
                "max_file_size ({}) exceeds max_memory_usage ({})",
                self.max_file_size, self.max_memory_usage
            )));
        }
        if self.read_concurrency == 0 {
            return Err(CacheError::InvalidConfig(
                "read_concurrency must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_memory_usage: 256 * 1024 * 1024,
            max_entries: 10_000,
            max_file_size: 10 * 1024 * 1024,
            ttl: Duration::from_secs(30 * 60),
            integrity_check_enabled: true,
            allowed_extensions: default_allowed_extensions(),
            read_concurrency: 10,
            sweep_interval: Duration::from_secs(5 * 60),
        }
    }
}

/// Default allow-list of common source and text extensions.
fn default_allowed_extensions() -> HashSet<String> {
    [
        "rs", "ts", "tsx", "js", "jsx", "mjs", "cjs", "py", "go", "java", "kt", "c", "h", "cc",
        "cpp", "hpp", "cs", "rb", "php", "swift", "sh", "bash", "sql", "md", "txt", "json",
        "yaml", "yml", "toml", "xml", "html", "css", "scss", "ini", "cfg", "conf", "csv", "lock",
        "env", "properties",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_memory_usage, 256 * 1024 * 1024);
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.ttl, Duration::from_secs(1800));
        assert!(config.integrity_check_enabled);
        assert_eq!(config.read_concurrency, 10);
        assert_eq!(config.sweep_interval, Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("FILECACHE_MAX_MEMORY_USAGE");
        env::remove_var("FILECACHE_MAX_ENTRIES");
        env::remove_var("FILECACHE_MAX_FILE_SIZE");
        env::remove_var("FILECACHE_TTL_SECS");
        env::remove_var("FILECACHE_INTEGRITY_CHECK");
        env::remove_var("FILECACHE_READ_CONCURRENCY");
        env::remove_var("FILECACHE_SWEEP_INTERVAL_SECS");

        let config = CacheConfig::from_env();
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.ttl, Duration::from_secs(1800));
        assert_eq!(config.read_concurrency, 10);
    }

    #[test]
    fn test_default_extensions_cover_common_sources() {
        let config = CacheConfig::default();
        for ext in ["rs", "ts", "py", "md", "json", "toml"] {
            assert!(
                config.allowed_extensions.contains(ext),
                "extension '{}' should be allowed by default",
                ext
            );
        }
        assert!(!config.allowed_extensions.contains("exe"));
    }

    #[test]
    fn test_validate_rejects_zero_budgets() {
        let mut config = CacheConfig::default();
        config.max_memory_usage = 0;
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));

        let mut config = CacheConfig::default();
        config.max_entries = 0;
        assert!(config.validate().is_err());

        let mut config = CacheConfig::default();
        config.read_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_ceiling_above_budget() {
        let mut config = CacheConfig::default();
        config.max_memory_usage = 1024;
        config.max_file_size = 2048;
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }
}
