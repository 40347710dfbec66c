//! Monitor configuration
//!
//! Configuration is loaded once before an epoch starts and never changes
//! while the epoch runs; the only way to apply new settings is a restart.
//! Everything in this module therefore produces plain immutable values,
//! validated once at the boundary:
//!
//! - `pre_alarm < alarm` when a pre-alarm threshold is configured
//! - `reset_hysteresis > 0`
//! - all thresholds finite, all intervals non-zero
//!
//! The rest of the core assumes a validated [`MonitorConfig`].
//!
//! ```
//! use thermoguard_core::config::MonitorConfig;
//!
//! let config = MonitorConfig::builder()
//!     .pre_alarm(30.0)
//!     .alarm(35.0)
//!     .reset_hysteresis(1.0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.thresholds.clear_point(), 29.0);
//! ```

use crate::constants::{
    DEFAULT_ALARM_C, DEFAULT_HEARTBEAT_INTERVAL_MS, DEFAULT_HOLD_COUNT,
    DEFAULT_NOTIFICATION_INTERVAL_MS, DEFAULT_PRE_ALARM_C, DEFAULT_RESET_HYSTERESIS_C,
    DEFAULT_SAMPLE_INTERVAL_MS,
};
use crate::errors::ConfigError;
use crate::time::Millis;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Temperature boundaries with hysteresis
///
/// Rising edges compare against `pre_alarm` / `alarm`; the falling edge
/// compares against the strictly lower [`clear_point`](Self::clear_point).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Thresholds {
    /// Attention threshold (°C); absent in single-threshold deployments
    pub pre_alarm: Option<f32>,
    /// Alarm threshold (°C)
    pub alarm: f32,
    /// Degrees below the lower threshold at which an alarm clears
    pub reset_hysteresis: f32,
}

impl Thresholds {
    /// Lower of the configured thresholds
    pub fn lower(&self) -> f32 {
        match self.pre_alarm {
            Some(pre_alarm) => pre_alarm.min(self.alarm),
            None => self.alarm,
        }
    }

    /// Temperature at or below which an active alarm clears
    pub fn clear_point(&self) -> f32 {
        self.lower() - self.reset_hysteresis
    }

    /// Check the invariants the classifier relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.alarm.is_finite() {
            return Err(ConfigError::InvalidValue { field: "alarm_threshold" });
        }
        if !self.reset_hysteresis.is_finite() {
            return Err(ConfigError::InvalidValue { field: "reset_hysteresis" });
        }
        if self.reset_hysteresis <= 0.0 {
            return Err(ConfigError::NonPositiveHysteresis { value: self.reset_hysteresis });
        }
        if let Some(pre_alarm) = self.pre_alarm {
            if !pre_alarm.is_finite() {
                return Err(ConfigError::InvalidValue { field: "pre_alarm_threshold" });
            }
            if pre_alarm >= self.alarm {
                return Err(ConfigError::ThresholdOrder { pre_alarm, alarm: self.alarm });
            }
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pre_alarm: Some(DEFAULT_PRE_ALARM_C),
            alarm: DEFAULT_ALARM_C,
            reset_hysteresis: DEFAULT_RESET_HYSTERESIS_C,
        }
    }
}

/// Everything the monitor needs for one epoch
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorConfig {
    /// Alarm boundaries
    pub thresholds: Thresholds,
    /// Spacing between temperature samples (ms)
    pub sample_interval: Millis,
    /// Minimum spacing between repeated notifications of one kind (ms)
    pub notification_interval: Millis,
    /// Spacing between "still alive" notifications (ms); `None` disables them
    pub heartbeat_interval: Option<Millis>,
    /// Consecutive held debounce ticks that request configuration mode
    pub trigger_hold_count: u32,
}

impl MonitorConfig {
    /// Start from factory defaults
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::new()
    }

    /// Reject configurations the classifier cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;

        if self.sample_interval == 0 {
            return Err(ConfigError::ZeroInterval { field: "sample_interval" });
        }
        if self.notification_interval == 0 {
            return Err(ConfigError::ZeroInterval { field: "notification_interval" });
        }
        if self.heartbeat_interval == Some(0) {
            return Err(ConfigError::ZeroInterval { field: "heartbeat_interval" });
        }
        if self.trigger_hold_count == 0 {
            return Err(ConfigError::ZeroInterval { field: "trigger_hold_count" });
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL_MS,
            notification_interval: DEFAULT_NOTIFICATION_INTERVAL_MS,
            heartbeat_interval: Some(DEFAULT_HEARTBEAT_INTERVAL_MS),
            trigger_hold_count: DEFAULT_HOLD_COUNT,
        }
    }
}

/// Builder for [`MonitorConfig`]; `build` validates
#[derive(Debug, Clone)]
pub struct MonitorConfigBuilder {
    config: MonitorConfig,
}

impl MonitorConfigBuilder {
    /// Builder seeded with factory defaults
    pub fn new() -> Self {
        Self { config: MonitorConfig::default() }
    }

    /// Attention threshold (°C)
    pub fn pre_alarm(mut self, celsius: f32) -> Self {
        self.config.thresholds.pre_alarm = Some(celsius);
        self
    }

    /// Single-threshold mode: only the alarm boundary is used
    pub fn without_pre_alarm(mut self) -> Self {
        self.config.thresholds.pre_alarm = None;
        self
    }

    /// Alarm threshold (°C)
    pub fn alarm(mut self, celsius: f32) -> Self {
        self.config.thresholds.alarm = celsius;
        self
    }

    /// Degrees below the lower threshold at which an alarm clears
    pub fn reset_hysteresis(mut self, celsius: f32) -> Self {
        self.config.thresholds.reset_hysteresis = celsius;
        self
    }

    /// Sampling period (ms)
    pub fn sample_interval(mut self, ms: Millis) -> Self {
        self.config.sample_interval = ms;
        self
    }

    /// Throttle window per notification kind (ms)
    pub fn notification_interval(mut self, ms: Millis) -> Self {
        self.config.notification_interval = ms;
        self
    }

    /// Enable heartbeats every `ms`
    pub fn heartbeat_interval(mut self, ms: Millis) -> Self {
        self.config.heartbeat_interval = Some(ms);
        self
    }

    /// Disable heartbeats
    pub fn without_heartbeat(mut self) -> Self {
        self.config.heartbeat_interval = None;
        self
    }

    /// Held debounce ticks needed to request configuration
    pub fn trigger_hold_count(mut self, ticks: u32) -> Self {
        self.config.trigger_hold_count = ticks;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<MonitorConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for MonitorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only typed access to the persisted settings
///
/// Implemented by whatever holds the device settings (flash key/value
/// store, JSON file, test fixture). `None` means the key is absent.
pub trait ConfigStore {
    /// Attention threshold (°C)
    fn pre_alarm_threshold(&self) -> Option<f32>;

    /// Alarm threshold (°C)
    fn alarm_threshold(&self) -> Option<f32>;

    /// Clearing margin (°C)
    fn reset_hysteresis(&self) -> Option<f32>;

    /// Sampling period (ms)
    fn sample_interval_ms(&self) -> Option<Millis>;

    /// Throttle window (ms)
    fn notification_interval_ms(&self) -> Option<Millis>;

    /// `None` when heartbeat notifications are disabled
    fn heartbeat_interval_ms(&self) -> Option<Millis>;

    /// Debounce hold count; stores without the key use the default
    fn trigger_hold_count(&self) -> Option<u32> {
        None
    }
}

/// Build and validate the epoch configuration from a settings store
pub fn load_config<S: ConfigStore + ?Sized>(store: &S) -> Result<MonitorConfig, ConfigError> {
    let config = MonitorConfig {
        thresholds: Thresholds {
            pre_alarm: store.pre_alarm_threshold(),
            alarm: store
                .alarm_threshold()
                .ok_or(ConfigError::Missing { field: "alarm_threshold" })?,
            reset_hysteresis: store
                .reset_hysteresis()
                .ok_or(ConfigError::Missing { field: "reset_hysteresis" })?,
        },
        sample_interval: store
            .sample_interval_ms()
            .ok_or(ConfigError::Missing { field: "sample_interval" })?,
        notification_interval: store
            .notification_interval_ms()
            .ok_or(ConfigError::Missing { field: "notification_interval" })?,
        heartbeat_interval: store.heartbeat_interval_ms(),
        trigger_hold_count: store.trigger_hold_count().unwrap_or(DEFAULT_HOLD_COUNT),
    };

    config.validate()?;
    log_info!(
        "Configuration loaded: pre_alarm={:?} alarm={} clear={} sample={}ms",
        config.thresholds.pre_alarm,
        config.thresholds.alarm,
        config.thresholds.clear_point(),
        config.sample_interval
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Settings {
        pre_alarm: Option<f32>,
        alarm: Option<f32>,
        heartbeat: Option<Millis>,
    }

    impl ConfigStore for Settings {
        fn pre_alarm_threshold(&self) -> Option<f32> {
            self.pre_alarm
        }
        fn alarm_threshold(&self) -> Option<f32> {
            self.alarm
        }
        fn reset_hysteresis(&self) -> Option<f32> {
            Some(1.0)
        }
        fn sample_interval_ms(&self) -> Option<Millis> {
            Some(60_000)
        }
        fn notification_interval_ms(&self) -> Option<Millis> {
            Some(600_000)
        }
        fn heartbeat_interval_ms(&self) -> Option<Millis> {
            self.heartbeat
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn clear_point_uses_lower_threshold() {
        let dual = Thresholds { pre_alarm: Some(30.0), alarm: 35.0, reset_hysteresis: 1.0 };
        assert_eq!(dual.clear_point(), 29.0);

        let single = Thresholds { pre_alarm: None, alarm: 35.0, reset_hysteresis: 2.0 };
        assert_eq!(single.clear_point(), 33.0);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let result = MonitorConfig::builder().pre_alarm(36.0).alarm(35.0).build();
        assert!(matches!(result, Err(ConfigError::ThresholdOrder { .. })));

        // Equal is inverted too: there would be no pre-alarm band
        let result = MonitorConfig::builder().pre_alarm(35.0).alarm(35.0).build();
        assert!(matches!(result, Err(ConfigError::ThresholdOrder { .. })));
    }

    #[test]
    fn rejects_bad_hysteresis_and_intervals() {
        let result = MonitorConfig::builder().reset_hysteresis(0.0).build();
        assert!(matches!(result, Err(ConfigError::NonPositiveHysteresis { .. })));

        let result = MonitorConfig::builder().reset_hysteresis(f32::NAN).build();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        let result = MonitorConfig::builder().sample_interval(0).build();
        assert_eq!(result, Err(ConfigError::ZeroInterval { field: "sample_interval" }));

        let result = MonitorConfig::builder().heartbeat_interval(0).build();
        assert_eq!(result, Err(ConfigError::ZeroInterval { field: "heartbeat_interval" }));
    }

    #[test]
    fn loads_from_store() {
        let store = Settings { pre_alarm: Some(30.0), alarm: Some(35.0), heartbeat: None };
        let config = load_config(&store).unwrap();

        assert_eq!(config.thresholds.pre_alarm, Some(30.0));
        assert_eq!(config.heartbeat_interval, None);
        assert_eq!(config.trigger_hold_count, DEFAULT_HOLD_COUNT);
    }

    #[test]
    fn store_missing_alarm_is_rejected() {
        let store = Settings { pre_alarm: None, alarm: None, heartbeat: None };
        assert_eq!(
            load_config(&store),
            Err(ConfigError::Missing { field: "alarm_threshold" })
        );
    }
}
