//! Monitor state
//!
//! Exactly one state is active at a time. The loop also keeps the state of
//! the previous tick so it can react to edges (just entered) rather than
//! levels (currently in).
//!
//! ```text
//!            reading in [pre, alarm)          reading >= alarm
//!   Idle ─────────────────────────► PreAlarm ─────────────────► Alarm
//!    ▲  ╲                              │                        │
//!    │   ╲────────── reading >= alarm ─┼───────────────────────►│
//!    │                                 │ reading <= clear point │
//!    ◄─────────────────────────────────┴────────────────────────┘
//!
//!   any ── 5 consecutive faults ──► SensorFailure ── 1 good reading ──► Idle
//!   any ── button held ──► ConfigRequested (absorbing until restart)
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current alarm state of the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum MonitorState {
    /// Temperature below the attention band
    #[default]
    Idle = 0,
    /// Temperature in the attention band
    PreAlarm = 1,
    /// Temperature at or above the alarm threshold
    Alarm = 2,
    /// Sensor failed too many consecutive reads
    SensorFailure = 3,
    /// Operator asked for the configuration session
    ConfigRequested = 4,
}

impl MonitorState {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            MonitorState::Idle => "IDLE",
            MonitorState::PreAlarm => "PRE_ALARM",
            MonitorState::Alarm => "ALARM",
            MonitorState::SensorFailure => "SENSOR_FAILURE",
            MonitorState::ConfigRequested => "CONFIG",
        }
    }

    /// Pre-alarm or alarm: the states an alarm reset leaves
    pub const fn is_temperature_alarm(&self) -> bool {
        matches!(self, MonitorState::PreAlarm | MonitorState::Alarm)
    }
}

impl core::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MonitorState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name())
    }
}
