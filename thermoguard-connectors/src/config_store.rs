//! Settings file of the reference device
//!
//! The node persists its settings in two namespaces, kept here as two JSON
//! objects with the device's own key names and units:
//!
//! ```json
//! {
//!   "alarms": {
//!     "pre_alarm": 30.0,
//!     "alarm_threshold": 35.0,
//!     "reset_threshold": 1.0,
//!     "mesure_interval": 60,
//!     "alarm_interval": 10
//!   },
//!   "email": {
//!     "sender_address": "monitor@example.com",
//!     "author_name": "Server temp monitor",
//!     "recipient_1": "ops@example.com",
//!     "imAliveMessage": "yes",
//!     "imAlive_intrvl": 30
//!   }
//! }
//! ```
//!
//! Units on disk: °C, seconds (`mesure_interval`), minutes
//! (`alarm_interval`) and hours (`imAlive_intrvl`). [`JsonConfigStore`]
//! converts them to milliseconds for [`load_config`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thermoguard_core::config::{load_config, ConfigStore, MonitorConfig};
use thermoguard_core::constants::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use thermoguard_core::time::Millis;

use crate::ConnectorError;

/// `"alarms"` namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlarmSection {
    pub pre_alarm: Option<f32>,
    pub alarm_threshold: Option<f32>,
    pub reset_threshold: Option<f32>,
    /// Seconds between samples
    pub mesure_interval: Option<u32>,
    /// Minutes between repeated notifications of one kind
    pub alarm_interval: Option<u32>,
}

/// `"email"` namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailSection {
    pub sender_address: Option<String>,
    pub author_name: Option<String>,
    pub recipient_1: Option<String>,
    #[serde(rename = "imAliveMessage", default, with = "yes_no")]
    pub im_alive_message: bool,
    /// Hours between heartbeats
    #[serde(rename = "imAlive_intrvl")]
    pub im_alive_interval: Option<u32>,
}

/// Whole settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default)]
    pub alarms: AlarmSection,
    #[serde(default)]
    pub email: EmailSection,
}

/// Read-only [`ConfigStore`] over a parsed settings file
#[derive(Debug, Clone, Default)]
pub struct JsonConfigStore {
    settings: StoredSettings,
}

impl JsonConfigStore {
    pub fn new(settings: StoredSettings) -> Self {
        Self { settings }
    }

    pub fn from_json(json: &str) -> Result<Self, ConnectorError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConnectorError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn settings(&self) -> &StoredSettings {
        &self.settings
    }

    /// Validated monitor configuration
    pub fn monitor_config(&self) -> Result<MonitorConfig, ConnectorError> {
        Ok(load_config(self)?)
    }
}

fn scaled(value: Option<u32>, unit: Millis) -> Option<Millis> {
    // Overflowing values read as absent and are reported as missing
    value.and_then(|v| v.checked_mul(unit))
}

impl ConfigStore for JsonConfigStore {
    fn pre_alarm_threshold(&self) -> Option<f32> {
        self.settings.alarms.pre_alarm
    }

    fn alarm_threshold(&self) -> Option<f32> {
        self.settings.alarms.alarm_threshold
    }

    fn reset_hysteresis(&self) -> Option<f32> {
        self.settings.alarms.reset_threshold
    }

    fn sample_interval_ms(&self) -> Option<Millis> {
        scaled(self.settings.alarms.mesure_interval, MS_PER_SECOND)
    }

    fn notification_interval_ms(&self) -> Option<Millis> {
        scaled(self.settings.alarms.alarm_interval, MS_PER_MINUTE)
    }

    fn heartbeat_interval_ms(&self) -> Option<Millis> {
        if !self.settings.email.im_alive_message {
            return None;
        }
        scaled(self.settings.email.im_alive_interval, MS_PER_HOUR)
    }
}

/// Where the supervisor gets a configuration at the start of each epoch
pub trait SettingsSource {
    fn load(&self) -> Result<MonitorConfig, ConnectorError>;
}

/// Fixed configuration, mostly for tests and simulations
impl SettingsSource for MonitorConfig {
    fn load(&self) -> Result<MonitorConfig, ConnectorError> {
        self.validate()?;
        Ok(*self)
    }
}

impl SettingsSource for JsonConfigStore {
    fn load(&self) -> Result<MonitorConfig, ConnectorError> {
        self.monitor_config()
    }
}

/// Settings file re-read on every load, so a configuration session that
/// rewrites it takes effect on the next epoch
#[derive(Debug, Clone)]
pub struct JsonSettingsFile {
    path: PathBuf,
}

impl JsonSettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<StoredSettings, ConnectorError> {
        Ok(JsonConfigStore::from_path(&self.path)?.settings)
    }

    pub fn write(&self, settings: &StoredSettings) -> Result<(), ConnectorError> {
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json)?;
        log::info!("Settings written to {}", self.path.display());
        Ok(())
    }
}

impl SettingsSource for JsonSettingsFile {
    fn load(&self) -> Result<MonitorConfig, ConnectorError> {
        JsonConfigStore::from_path(&self.path)?.monitor_config()
    }
}

/// The device stores flags as `"yes"`/`"no"`; plain booleans are accepted too
mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "yes" } else { "no" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Flag::deserialize(deserializer)? {
            Flag::Bool(value) => Ok(value),
            Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "1" => Ok(true),
                "no" | "false" | "0" | "" => Ok(false),
                other => Err(serde::de::Error::custom(format!("expected yes/no, got {other:?}"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermoguard_core::errors::ConfigError;

    const DEVICE_DEFAULTS: &str = r#"{
        "alarms": {
            "pre_alarm": 30.0,
            "alarm_threshold": 35.0,
            "reset_threshold": 1.0,
            "mesure_interval": 60,
            "alarm_interval": 10
        },
        "email": {
            "sender_address": "monitor@example.com",
            "recipient_1": "ops@example.com",
            "imAliveMessage": "no",
            "imAlive_intrvl": 30
        }
    }"#;

    #[test]
    fn converts_device_units() {
        let store = JsonConfigStore::from_json(DEVICE_DEFAULTS).unwrap();
        assert_eq!(store.sample_interval_ms(), Some(60_000));
        assert_eq!(store.notification_interval_ms(), Some(600_000));
        assert_eq!(store.heartbeat_interval_ms(), None);

        let config = store.monitor_config().unwrap();
        assert_eq!(config.thresholds.pre_alarm, Some(30.0));
        assert_eq!(config.thresholds.clear_point(), 29.0);
        assert_eq!(config.heartbeat_interval, None);
    }

    #[test]
    fn heartbeat_flag_enables_interval() {
        let json = DEVICE_DEFAULTS.replace(r#""imAliveMessage": "no""#, r#""imAliveMessage": "yes""#);
        let store = JsonConfigStore::from_json(&json).unwrap();
        assert_eq!(store.heartbeat_interval_ms(), Some(30 * 3_600_000));

        let json = DEVICE_DEFAULTS.replace(r#""imAliveMessage": "no""#, r#""imAliveMessage": true"#);
        assert!(JsonConfigStore::from_json(&json).unwrap().settings().email.im_alive_message);
    }

    #[test]
    fn rejects_unknown_flag_text() {
        let json = DEVICE_DEFAULTS.replace(r#""imAliveMessage": "no""#, r#""imAliveMessage": "maybe""#);
        assert!(matches!(JsonConfigStore::from_json(&json), Err(ConnectorError::Json(_))));
    }

    #[test]
    fn missing_alarm_threshold_is_reported() {
        let store = JsonConfigStore::from_json(r#"{ "alarms": { "reset_threshold": 1.0 } }"#).unwrap();
        let err = store.monitor_config().unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Config(ConfigError::Missing { field: "alarm_threshold" })
        ));
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let json = DEVICE_DEFAULTS.replace(r#""pre_alarm": 30.0"#, r#""pre_alarm": 40.0"#);
        let err = JsonConfigStore::from_json(&json).unwrap().monitor_config().unwrap_err();
        assert!(matches!(err, ConnectorError::Config(ConfigError::ThresholdOrder { .. })));
    }

    #[test]
    fn overflowing_interval_reads_as_missing() {
        let json = DEVICE_DEFAULTS.replace(r#""alarm_interval": 10"#, r#""alarm_interval": 4000000"#);
        let store = JsonConfigStore::from_json(&json).unwrap();
        assert_eq!(store.notification_interval_ms(), None);
    }

    #[test]
    fn settings_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonSettingsFile::new(dir.path().join("settings.json"));

        let mut settings = JsonConfigStore::from_json(DEVICE_DEFAULTS).unwrap().settings().clone();
        settings.alarms.alarm_threshold = Some(38.0);
        file.write(&settings).unwrap();

        assert_eq!(file.read().unwrap(), settings);
        assert_eq!(file.load().unwrap().thresholds.alarm, 38.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let file = JsonSettingsFile::new("/nonexistent/thermoguard/settings.json");
        assert!(matches!(file.load(), Err(ConnectorError::Io(_))));
    }
}
