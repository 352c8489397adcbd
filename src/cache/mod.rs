//! Cache Module
//!
//! Provides the in-memory engine: scalar entries and hash buckets with
//! per-entry TTL expiration.

mod decompose;
mod entry;
mod hash;
mod record;
mod stats;
mod store;
mod value;


use std::time::Duration;

// Re-export public types
pub use entry::Expiry;
pub(crate) use entry::CacheEntry;
pub use record::{Record, Serialized};
pub use stats::CacheStats;
pub use store::Cache;
pub use value::Value;

// == Public Constants ==
/// TTL meaning "never expires".
pub const NO_EXPIRY: Duration = Duration::ZERO;
