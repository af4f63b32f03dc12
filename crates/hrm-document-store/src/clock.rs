//! Time source for ids and record timestamps.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Debug;

/// Supplies "now" to the store.
pub trait Clock: Send + Sync + Debug {
    /// Current time as milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;

    /// Current time as an RFC 3339 UTC string with millisecond precision,
    /// e.g. `2024-03-01T09:30:00.000Z`.
    fn now_rfc3339(&self) -> String {
        format_millis(self.now_millis())
    }
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Render epoch milliseconds the way record timestamps are stored.
pub fn format_millis(millis: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Test clock that starts at a fixed instant and advances by one
/// millisecond per reading, so successive timestamps are distinct.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub struct FixedClock {
    millis: parking_lot::Mutex<u64>,
}

#[cfg(any(test, feature = "testing"))]
impl FixedClock {
    pub fn new(millis: u64) -> Self {
        Self {
            millis: parking_lot::Mutex::new(millis),
        }
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance(&self, ms: u64) {
        *self.millis.lock() += ms;
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        let mut millis = self.millis.lock();
        let now = *millis;
        *millis += 1;
        now
    }
}
