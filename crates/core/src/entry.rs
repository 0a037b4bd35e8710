//! Stored entries and deadline arithmetic.

use std::time::{Duration, Instant};

/// Upper bound applied to TTLs before computing a deadline (~100 years).
///
/// Larger values would overflow `Instant` arithmetic on some platforms.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Computes the absolute deadline for an entry written at `now`.
///
/// A zero TTL yields `now`, so the entry is already expired.
pub fn deadline(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now)
}

/// A single stored value with its absolute expiration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    /// Creates an entry written at `now` that lives for `ttl`.
    pub fn new(value: V, now: Instant, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: deadline(now, ttl),
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Returns true once `now` has reached the deadline.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at <= now
    }

    /// Time left before expiry, zero if already expired.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }

    /// Restarts the lifetime of the entry as if it had been written at `now`.
    pub fn refresh(&mut self, now: Instant, ttl: Duration) {
        self.expires_at = deadline(now, ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_adds_ttl() {
        let now = Instant::now();
        assert_eq!(deadline(now, Duration::from_secs(4)), now + Duration::from_secs(4));
    }

    #[test]
    fn test_deadline_zero_ttl_is_now() {
        let now = Instant::now();
        assert_eq!(deadline(now, Duration::ZERO), now);
    }

    #[test]
    fn test_deadline_clamps_huge_ttl() {
        let now = Instant::now();
        assert_eq!(deadline(now, Duration::MAX), deadline(now, MAX_TTL));
    }

    #[test]
    fn test_entry_not_expired_before_deadline() {
        let now = Instant::now();
        let entry = Entry::new("a b c", now, Duration::from_secs(2));

        assert!(!entry.is_expired_at(now));
        assert!(!entry.is_expired_at(now + Duration::from_millis(1999)));
        assert_eq!(entry.value(), &"a b c");
    }

    #[test]
    fn test_entry_expired_at_deadline() {
        let now = Instant::now();
        let entry = Entry::new(1, now, Duration::from_secs(2));

        assert!(entry.is_expired_at(now + Duration::from_secs(2)));
        assert!(entry.is_expired_at(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_zero_ttl_entry_is_immediately_expired() {
        let now = Instant::now();
        let entry = Entry::new(1, now, Duration::ZERO);
        assert!(entry.is_expired_at(now));
    }

    #[test]
    fn test_remaining_saturates_at_zero() {
        let now = Instant::now();
        let entry = Entry::new((), now, Duration::from_secs(2));

        assert_eq!(entry.remaining_at(now), Duration::from_secs(2));
        assert_eq!(
            entry.remaining_at(now + Duration::from_millis(500)),
            Duration::from_millis(1500)
        );
        assert_eq!(entry.remaining_at(now + Duration::from_secs(10)), Duration::ZERO);
    }

    #[test]
    fn test_refresh_moves_deadline_forward() {
        let now = Instant::now();
        let mut entry = Entry::new("v", now, Duration::from_secs(2));

        let later = now + Duration::from_secs(1);
        entry.refresh(later, Duration::from_secs(2));

        assert_eq!(entry.expires_at(), later + Duration::from_secs(2));
        assert!(!entry.is_expired_at(now + Duration::from_secs(2)));
    }

    #[test]
    fn test_into_value() {
        let entry = Entry::new(vec![1, 2, 3], Instant::now(), Duration::from_secs(1));
        assert_eq!(entry.into_value(), vec![1, 2, 3]);
    }
}
