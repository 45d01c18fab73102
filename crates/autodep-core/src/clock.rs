//! Time source for expiry bookkeeping.

use std::sync::atomic::{AtomicI64, Ordering};

/// Supplies the current time as epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall-clock time via chrono.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// Used to pin "now" for a whole run (every expiry computed from the same
/// instant) and for deterministic tests.
#[derive(Debug, Default)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.millis.fetch_add(secs * 1000, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Expiry timestamp for a TTL measured from `now`.
pub fn expire_at(now_millis: i64, ttl_seconds: u64) -> i64 {
    let ttl_millis = i64::try_from(ttl_seconds)
        .ok()
        .and_then(|secs| secs.checked_mul(1000))
        .unwrap_or(i64::MAX);
    now_millis.saturating_add(ttl_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_at_adds_milliseconds() {
        assert_eq!(expire_at(1_000, 86_400), 86_401_000);
        assert_eq!(expire_at(0, 0), 0);
    }

    #[test]
    fn test_expire_at_saturates() {
        assert_eq!(expire_at(i64::MAX - 5, 10), i64::MAX);
        assert_eq!(expire_at(0, 9_223_372_036_854_776), i64::MAX);
        assert_eq!(expire_at(1, u64::MAX), i64::MAX);
        assert_eq!(expire_at(0, 9_223_372_036_854_775), 9_223_372_036_854_775_000);
    }

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::new(10_000);
        clock.advance_secs(2);
        assert_eq!(clock.now_millis(), 12_000);
        clock.set(5);
        assert_eq!(clock.now_millis(), 5);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
