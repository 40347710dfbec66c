//! Notification throttling
//!
//! ## Overview
//!
//! A human reads these notifications, so repeating one every sample would
//! bury the useful ones. The [`NotificationGate`] lets a kind through when
//! either:
//!
//! - it has never fired in this process (first occurrence), or
//! - more than `notification_interval` has elapsed since it last fired.
//!
//! The first-occurrence override matters right after boot: the ledger's
//! default timestamp is zero, so without the flag a pre-alarm in the first
//! minutes of uptime would be silently throttled.
//!
//! ## Two-phase protocol
//!
//! ```text
//! if gate.should_notify(kind, now) {
//!     gate.record_sent(kind, now);   // decision to attempt
//!     transport.send(..);            // result only logged
//! }
//! ```
//!
//! The ledger records the attempt, not the delivery. Sends are never
//! retried, so an unreachable mail server does not turn into one attempt
//! per tick.
//!
//! ## Re-arming
//!
//! When a temperature alarm clears, the `PreAlarm` and `Alarm` kinds are
//! re-armed so the next excursion is a fresh first occurrence. Recovery
//! from a sensor failure re-arms `SensorFailure` the same way.

use crate::time::{elapsed, Millis, Timestamp};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of notification kinds tracked by the ledger
pub const KIND_COUNT: usize = 5;

/// Kinds of notification the monitor can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum NotificationKind {
    /// Temperature entered the attention band
    PreAlarm = 0,
    /// Temperature reached the alarm threshold
    Alarm = 1,
    /// Temperature fell back to the clear point
    AlarmReset = 2,
    /// Sensor unreadable
    SensorFailure = 3,
    /// Periodic "still alive"
    Heartbeat = 4,
}

impl NotificationKind {
    /// All kinds, in ledger order
    pub const ALL: [NotificationKind; KIND_COUNT] = [
        NotificationKind::PreAlarm,
        NotificationKind::Alarm,
        NotificationKind::AlarmReset,
        NotificationKind::SensorFailure,
        NotificationKind::Heartbeat,
    ];

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            NotificationKind::PreAlarm => "PRE_ALARM",
            NotificationKind::Alarm => "ALARM",
            NotificationKind::AlarmReset => "ALARM_RESET",
            NotificationKind::SensorFailure => "SENSOR_FAILURE",
            NotificationKind::Heartbeat => "IM_ALIVE",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ledger state for one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerEntry {
    /// Counter value when the kind last fired
    pub last_sent: Timestamp,
    /// Whether the kind has fired since boot (or since it was re-armed)
    pub has_fired: bool,
}

/// Last-sent bookkeeping for every notification kind
#[derive(Debug, Clone, Default)]
pub struct NotificationLedger {
    entries: [LedgerEntry; KIND_COUNT],
}

impl NotificationLedger {
    /// Empty ledger: nothing has fired
    pub fn new() -> Self {
        Self::default()
    }

    /// Bookkeeping for `kind`
    pub fn entry(&self, kind: NotificationKind) -> &LedgerEntry {
        &self.entries[kind.index()]
    }

    /// Mark `kind` as fired at `now`
    pub fn record(&mut self, kind: NotificationKind, now: Timestamp) {
        self.entries[kind.index()] = LedgerEntry {
            last_sent: now,
            has_fired: true,
        };
    }

    /// Treat the next notification of `kind` as a first occurrence
    pub fn rearm(&mut self, kind: NotificationKind) {
        self.entries[kind.index()].has_fired = false;
    }
}

/// Decides whether a notification may go out now
#[derive(Debug, Clone)]
pub struct NotificationGate {
    interval: Millis,
    ledger: NotificationLedger,
}

impl NotificationGate {
    /// Gate with a throttle window of `interval` ms
    pub fn new(interval: Millis) -> Self {
        Self {
            interval,
            ledger: NotificationLedger::new(),
        }
    }

    /// Throttle window (ms)
    pub fn interval(&self) -> Millis {
        self.interval
    }

    /// True if `kind` has never fired or its interval has passed
    pub fn should_notify(&self, kind: NotificationKind, now: Timestamp) -> bool {
        let entry = self.ledger.entry(kind);
        !entry.has_fired || elapsed(entry.last_sent, now) > self.interval
    }

    /// Record the decision to send; call after `should_notify` returned true
    pub fn record_sent(&mut self, kind: NotificationKind, now: Timestamp) {
        self.ledger.record(kind, now);
    }

    /// Next `kind` counts as a first occurrence
    pub fn rearm(&mut self, kind: NotificationKind) {
        self.ledger.rearm(kind);
    }

    /// Underlying ledger
    pub fn ledger(&self) -> &NotificationLedger {
        &self.ledger
    }
}
