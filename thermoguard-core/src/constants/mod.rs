//! Constants for ThermoGuard Core
//!
//! Centralised values used by the monitor. Each constant names its unit and
//! where the number comes from (sensor datasheet, device wiring, or the
//! factory settings of the reference node).
//!
//! ## Organization
//!
//! - **Time**: unit conversions and default intervals
//! - **Sensors**: driver sentinels and fault tolerance
//! - **Alarms**: factory thresholds and the mode-switch debounce

/// Time unit conversions and default intervals.
pub mod time;

/// Sensor driver sentinels and fault escalation.
pub mod sensors;

/// Factory alarm thresholds and debounce parameters.
pub mod alarms;

pub use time::{
    MS_PER_SECOND, MS_PER_MINUTE, MS_PER_HOUR,
    DEFAULT_SAMPLE_INTERVAL_MS, DEFAULT_NOTIFICATION_INTERVAL_MS, DEFAULT_HEARTBEAT_INTERVAL_MS,
};

pub use sensors::{DEVICE_DISCONNECTED_C, FAULT_ESCALATION_THRESHOLD};

pub use alarms::{
    DEFAULT_PRE_ALARM_C, DEFAULT_ALARM_C, DEFAULT_RESET_HYSTERESIS_C,
    DEBOUNCE_TICK_MS, DEFAULT_HOLD_COUNT,
};
