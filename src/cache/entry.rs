//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use crate::cache::Value;
use crate::error::{CacheError, Result};

// == Expiry ==
/// Remaining lifetime of a live entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The entry was stored without a TTL
    Never,
    /// The entry expires after this much more time
    In(Duration),
}

// == Cache Entry ==
/// A stored value together with its expiration deadline.
///
/// Used both for scalar keys and for individual fields inside a hash bucket.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Expiration deadline on the monotonic clock, None = no expiration
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry whose TTL starts at `now`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Time to live, `Duration::ZERO` for no expiration
    /// * `now` - The clock reading of the calling operation
    pub fn new(value: Value, ttl: Duration, now: Instant) -> Result<Self> {
        Ok(Self {
            value,
            expires_at: deadline(ttl, now)?,
        })
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches the deadline,
    /// so a fully elapsed TTL is never observed as live.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    pub fn is_live(&self, now: Instant) -> bool {
        !self.is_expired(now)
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the entry has expired.
    pub fn expiry(&self, now: Instant) -> Option<Expiry> {
        match self.expires_at {
            None => Some(Expiry::Never),
            Some(expires) if expires > now => Some(Expiry::In(expires - now)),
            Some(_) => None,
        }
    }
}

// == Utility Functions ==
/// Computes the absolute deadline for `ttl`, rejecting TTLs the clock cannot hold.
pub(crate) fn deadline(ttl: Duration, now: Instant) -> Result<Option<Instant>> {
    if ttl.is_zero() {
        return Ok(None);
    }
    now.checked_add(ttl).map(Some).ok_or_else(|| {
        CacheError::invalid_argument(format!("TTL of {:?} cannot be represented", ttl))
    })
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation_no_ttl() {
        let now = Instant::now();
        let entry = CacheEntry::new(Value::from("test_value"), Duration::ZERO, now).unwrap();

        assert_eq!(entry.value, Value::from("test_value"));
        assert!(entry.expires_at.is_none());
        assert!(entry.is_live(now + Duration::from_secs(86_400)));
        assert_eq!(entry.expiry(now), Some(Expiry::Never));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let now = Instant::now();
        let entry = CacheEntry::new(Value::from(1), Duration::from_secs(10), now).unwrap();

        assert_eq!(entry.expires_at, Some(now + Duration::from_secs(10)));
        assert!(entry.is_live(now));
        assert_eq!(
            entry.expiry(now + Duration::from_secs(4)),
            Some(Expiry::In(Duration::from_secs(6)))
        );
    }

    #[test]
    fn test_entry_expiration() {
        let now = Instant::now();
        let entry = CacheEntry::new(Value::Null, Duration::from_millis(100), now).unwrap();

        assert!(!entry.is_expired(now + Duration::from_millis(99)));
        assert!(entry.is_expired(now + Duration::from_millis(150)));
        assert_eq!(entry.expiry(now + Duration::from_millis(150)), None);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: Value::from("test"),
            expires_at: Some(now), // Expires exactly at creation time
        };

        assert!(entry.is_expired(now), "Entry should be expired at boundary");
        assert_eq!(entry.expiry(now), None);
    }

    #[test]
    fn test_unrepresentable_ttl() {
        let result = CacheEntry::new(Value::Null, Duration::MAX, Instant::now());
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }
}
