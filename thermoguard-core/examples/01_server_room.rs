//! Server Room Walkthrough
//!
//! Drives the monitor through a warm afternoon in the server room with a
//! scripted probe and a fixed clock, printing every decision.
//!
//! ## What You'll Learn
//!
//! - Building a validated configuration
//! - Implementing the sensor, link and transport collaborators
//! - Reading a `TickReport` after each tick
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_server_room
//! ```

use thermoguard_core::{
    config::MonitorConfig,
    errors::{SendError, SensorError},
    message::Message,
    monitor::MonitorLoop,
    time::{FixedTime, TimeSource},
    traits::{Connectivity, TemperatureSensor, Transport},
    trigger::{ConfigModeTrigger, TriggerCell},
};

const MINUTE: u32 = 60_000;

/// Probe readings, one per minute; -127 is the disconnected sentinel
struct Probe {
    readings: Vec<f32>,
    next: usize,
}

impl TemperatureSensor for Probe {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        let reading = self.readings.get(self.next).copied().unwrap_or(24.0);
        self.next += 1;
        Ok(reading)
    }
}

struct Wifi;

impl Connectivity for Wifi {
    fn connect(&mut self) -> bool {
        true
    }

    fn is_connected(&self) -> bool {
        true
    }
}

struct Console;

impl Transport for Console {
    fn send(&mut self, message: &Message) -> Result<(), SendError> {
        println!("    >> [{}] {}", message.kind, message.subject);
        println!("       {}", message.body);
        Ok(())
    }
}

fn main() {
    println!("ThermoGuard Server Room Example");
    println!("===============================\n");

    let config = MonitorConfig::builder()
        .pre_alarm(30.0)
        .alarm(35.0)
        .reset_hysteresis(1.0)
        .sample_interval(MINUTE)
        .notification_interval(10 * MINUTE)
        .without_heartbeat()
        .build()
        .expect("thresholds are ordered");

    println!("Thresholds: pre-alarm {:?} °C, alarm {} °C, clears at {} °C\n",
        config.thresholds.pre_alarm,
        config.thresholds.alarm,
        config.thresholds.clear_point());

    let probe = Probe {
        readings: vec![
            26.0, 28.5, 30.2, 31.0, 33.4, 35.6, 36.1, 34.0, 31.0, 29.5,
            -127.0, -127.0, -127.0, -127.0, -127.0, 27.0, 26.5,
        ],
        next: 0,
    };

    let trigger = TriggerCell::new(ConfigModeTrigger::new(config.trigger_hold_count));
    let mut clock = FixedTime::new(0);
    let mut monitor = MonitorLoop::new(config, probe, Wifi, Console, clock.now());

    for _ in 0..17 {
        let report = monitor.tick(clock.now(), &trigger);
        let reading = match report.sample.and_then(|s| s.reading()) {
            Some(celsius) => format!("{:5.1} °C", celsius),
            None => "  fault ".to_string(),
        };
        println!("t={:3} min  {}  {:>14} -> {}",
            clock.now() / MINUTE,
            reading,
            report.previous_state.name(),
            report.state.name());

        clock.advance(MINUTE);
    }

    println!("\nUptime: {} s", monitor.uptime_secs());
}
