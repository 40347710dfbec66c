//! Alarm Threshold and Debounce Constants
//!
//! Factory settings of the reference node. Deployments override the
//! thresholds through the settings store.

/// Pre-alarm (attention) threshold (°C).
pub const DEFAULT_PRE_ALARM_C: f32 = 30.0;

/// Alarm threshold (°C).
pub const DEFAULT_ALARM_C: f32 = 35.0;

/// Hysteresis subtracted from the lower threshold to form the clear point (°C).
pub const DEFAULT_RESET_HYSTERESIS_C: f32 = 1.0;

/// Period of the mode-switch button sampling tick (milliseconds).
pub const DEBOUNCE_TICK_MS: u32 = 100;

/// Consecutive held ticks needed to request configuration mode.
///
/// 30 ticks at 100 ms: the button must be held for three seconds.
pub const DEFAULT_HOLD_COUNT: u32 = 30;
