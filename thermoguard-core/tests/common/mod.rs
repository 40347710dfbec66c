//! Shared collaborators and fixtures for the monitor integration tests
//!
//! - `ScriptedSensor`: plays back a fixed list of readings/faults
//! - `Outbox`: records every message handed to the transport
//! - `Link`: connectivity that tests can drop at will

#![allow(dead_code)]

use std::collections::VecDeque;

use thermoguard_core::{
    config::MonitorConfig,
    errors::{SendError, SensorError},
    message::Message,
    monitor::MonitorLoop,
    notification::NotificationKind,
    traits::{Connectivity, TemperatureSensor, Transport},
    trigger::{ConfigModeTrigger, TriggerCell},
};

pub const SECOND: u32 = 1_000;
pub const MINUTE: u32 = 60 * SECOND;

/// Sensor that replays a script, then repeats the last entry
pub struct ScriptedSensor {
    script: VecDeque<Result<f32, SensorError>>,
    last: Result<f32, SensorError>,
}

impl ScriptedSensor {
    pub fn new(script: impl IntoIterator<Item = Result<f32, SensorError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: Err(SensorError::Disconnected),
        }
    }

    pub fn readings(values: &[f32]) -> Self {
        Self::new(values.iter().map(|v| Ok(*v)))
    }

    pub fn push(&mut self, reading: Result<f32, SensorError>) {
        self.script.push_back(reading);
    }
}

impl TemperatureSensor for ScriptedSensor {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// Transport that keeps every message
#[derive(Default)]
pub struct Outbox {
    pub messages: Vec<Message>,
    pub fail: bool,
}

impl Outbox {
    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.messages.iter().map(|m| m.kind).collect()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.messages.iter().filter(|m| m.kind == kind).count()
    }
}

impl Transport for Outbox {
    fn send(&mut self, message: &Message) -> Result<(), SendError> {
        self.messages.push(message.clone());
        if self.fail {
            return Err(SendError::Transport { reason: "smtp session closed" });
        }
        Ok(())
    }
}

pub struct Link {
    pub up: bool,
}

impl Connectivity for Link {
    fn connect(&mut self) -> bool {
        self.up = true;
        true
    }

    fn is_connected(&self) -> bool {
        self.up
    }
}

pub type TestMonitor = MonitorLoop<ScriptedSensor, Link, Outbox>;

/// Dual-threshold configuration used by most scenarios: 30/35/1 °C,
/// 1 min sampling, 10 min notification spacing, no heartbeat
pub fn server_room_config() -> MonitorConfig {
    MonitorConfig::builder()
        .pre_alarm(30.0)
        .alarm(35.0)
        .reset_hysteresis(1.0)
        .sample_interval(MINUTE)
        .notification_interval(10 * MINUTE)
        .without_heartbeat()
        .build()
        .expect("valid config")
}

pub fn monitor_with(config: MonitorConfig, sensor: ScriptedSensor) -> TestMonitor {
    MonitorLoop::new(config, sensor, Link { up: true }, Outbox::default(), 0)
}

pub fn idle_trigger() -> TriggerCell {
    TriggerCell::new(ConfigModeTrigger::new(30))
}
