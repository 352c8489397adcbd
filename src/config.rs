//! Configuration Module
//!
//! Handles loading cache engine settings from environment variables.

use std::env;
use std::time::Duration;

/// Cache engine configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interval in milliseconds between passive sweeps, 0 = no sweep
    pub sweep_interval_ms: u64,
    /// Drop a hash bucket as soon as its last field is removed
    pub prune_empty_buckets: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SWIFTCACHE_SWEEP_INTERVAL_MS` - Sweep interval in milliseconds (default: 0, disabled)
    /// - `SWIFTCACHE_PRUNE_EMPTY_BUCKETS` - `true`/`false` (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sweep_interval_ms: env::var("SWIFTCACHE_SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval_ms),
            prune_empty_buckets: env::var("SWIFTCACHE_PRUNE_EMPTY_BUCKETS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.prune_empty_buckets),
        }
    }

    /// Returns the sweep interval, or None when sweeping is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_ms > 0).then(|| Duration::from_millis(self.sweep_interval_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval_ms: 0,
            prune_empty_buckets: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.sweep_interval_ms, 0);
        assert!(config.prune_empty_buckets);
        assert!(config.sweep_interval().is_none());
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the env vars so parallel tests cannot race on them
        env::remove_var("SWIFTCACHE_SWEEP_INTERVAL_MS");
        env::remove_var("SWIFTCACHE_PRUNE_EMPTY_BUCKETS");
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("SWIFTCACHE_SWEEP_INTERVAL_MS", "250");
        env::set_var("SWIFTCACHE_PRUNE_EMPTY_BUCKETS", "false");
        let config = Config::from_env();
        assert_eq!(config.sweep_interval(), Some(Duration::from_millis(250)));
        assert!(!config.prune_empty_buckets);

        // Unparseable values fall back to defaults
        env::set_var("SWIFTCACHE_SWEEP_INTERVAL_MS", "soon");
        env::set_var("SWIFTCACHE_PRUNE_EMPTY_BUCKETS", "maybe");
        assert_eq!(Config::from_env(), Config::default());

        env::remove_var("SWIFTCACHE_SWEEP_INTERVAL_MS");
        env::remove_var("SWIFTCACHE_PRUNE_EMPTY_BUCKETS");
    }
}
