//! Expiring Value Module
//!
//! A value stamped with its creation and expiry time.

use chrono::Utc;

// == Expiring ==
/// A cached value with an optional absolute expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct Expiring<T> {
    /// The cached value
    pub value: T,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds), None = never expires
    pub expires_at: Option<i64>,
}

impl<T> Expiring<T> {
    /// Wraps `value` with an optional TTL in seconds.
    pub fn new(value: T, ttl_seconds: Option<u64>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = ttl_seconds.map(|ttl| now.saturating_add(ttl as i64 * 1000));

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    /// Wraps `value` with an absolute expiry timestamp in milliseconds.
    pub fn until(value: T, expires_at: i64) -> Self {
        Self {
            value,
            created_at: current_timestamp_ms(),
            expires_at: Some(expires_at),
        }
    }

    /// Checks if the value has expired.
    ///
    /// A value is expired once the current time is greater than or equal
    /// to its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiry check against an explicit clock reading.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
