//! Swiftcache - An embedded in-process key/value cache
//!
//! Provides scalar entries and hash buckets (field/value groups under one key),
//! each with optional TTL expiration. Expiration is lazy: expired entries are
//! invisible to reads and reclaimed when a read discovers them, or by an
//! optional background sweep.
//!
//! ```
//! use std::time::Duration;
//! use swiftcache::{Cache, Value, NO_EXPIRY};
//!
//! let cache = Cache::new();
//! cache.set("name", "leoantony", Duration::from_secs(60)).unwrap();
//! cache.hset("user", "age", 25, NO_EXPIRY).unwrap();
//!
//! assert!(cache.exists("name"));
//! assert_eq!(cache.hget("user", "age"), Some(Value::Int(25)));
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, Expiry, Record, Serialized, Value, NO_EXPIRY};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
