//! Idle Entry Expiry Task
//!
//! Background task that periodically evicts cache entries idle longer than
//! the configured TTL.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheEngine;

/// Spawns the periodic expiry sweep.
///
/// A single looping task sleeps for `sweep_interval` between passes, so
/// sweeps can never overlap; each pass takes the same write lock as the
/// synchronous cache operations. The returned handle can be aborted during
/// shutdown.
pub fn spawn_expiry_task(
    engine: Arc<RwLock<CacheEngine>>,
    sweep_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = sweep_interval.as_secs(),
            "starting cache expiry sweep task"
        );

        loop {
            tokio::time::sleep(sweep_interval).await;

            let removed = {
                let mut engine = engine.write().await;
                engine.expire_older_than(Utc::now())
            };

            if removed > 0 {
                info!(removed, "expiry sweep evicted idle entries");
            } else {
                debug!("expiry sweep found no idle entries");
            }
        }
    })
}
