//! Time management for an unattended monitor
//!
//! Every interval check in the monitor (sampling cadence, notification
//! throttling, heartbeat, debounce) is "elapsed since X exceeds Y". The
//! underlying counter is a free-running 32-bit millisecond tick, as exposed
//! by most MCU runtimes, so it wraps after ~49.7 days of uptime:
//!
//! ```text
//!   since                          MAX   0          now
//!     |------------------------------|   |-----------|
//!     (MAX - since)                  +1       now
//! ```
//!
//! [`elapsed`] is the only place that subtracts two timestamps.

/// Milliseconds since boot, read from a free-running counter that wraps
pub type Timestamp = u32;

/// A span of milliseconds between two [`Timestamp`]s
pub type Millis = u32;

/// Largest value the counter can hold before wrapping to zero
pub const COUNTER_MAX: Timestamp = Timestamp::MAX;

/// Wraparound-safe elapsed time between `since` and `now`.
///
/// If the counter wrapped (`now < since`) the result is
/// `(MAX - since) + now + 1`, otherwise `now - since`.
///
/// ```
/// use thermoguard_core::time::{elapsed, COUNTER_MAX};
///
/// assert_eq!(elapsed(1_000, 1_500), 500);
/// assert_eq!(elapsed(COUNTER_MAX - 1, 1), 3);
/// ```
#[inline]
pub const fn elapsed(since: Timestamp, now: Timestamp) -> Millis {
    if now < since {
        (COUNTER_MAX - since) + now + 1
    } else {
        now - since
    }
}

/// Source of time for the monitor
pub trait TimeSource {
    /// Current counter value in milliseconds
    fn now(&self) -> Timestamp;
}

/// Fixed time source for testing
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock stopped at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to `timestamp`
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advance the counter, wrapping like the hardware does
    pub fn advance(&mut self, ms: Millis) {
        self.timestamp = self.timestamp.wrapping_add(ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}
