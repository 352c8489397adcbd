//! Expired Entry Sweep Task
//!
//! Optional background task that periodically frees expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task runs in an infinite loop, sleeping for `interval` between sweeps.
/// Sweeping only reclaims memory: reads already treat expired entries as
/// absent, so running or not running this task is never observable.
///
/// Must be called from within a tokio runtime.
///
/// # Arguments
/// * `cache` - Handle to the cache to sweep
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Cache::with_config(&config);
/// if let Some(interval) = config.sweep_interval() {
///     let sweep_handle = spawn_sweep_task(cache.clone(), interval);
///     // Later, during shutdown:
///     sweep_handle.abort();
/// }
/// ```
pub fn spawn_sweep_task(cache: Cache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting expired entry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.sweep_expired();

            if removed > 0 {
                info!("Sweep: removed {} expired entries", removed);
            } else {
                debug!("Sweep: no expired entries found");
            }
        }
    })
}
