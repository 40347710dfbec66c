//! Core alarm engine for ThermoGuard
//!
//! Samples a temperature sensor on a fixed cadence, classifies each reading
//! against thresholds with hysteresis, and raises or clears notifications
//! while tolerating transient sensor faults and counter wraparound.
//! Designed for a single unattended node that must stay correct over
//! months of uptime.
//!
//! Key constraints:
//! - No heap allocation anywhere on the tick path
//! - No blocking inside the core; collaborators own all I/O
//! - Every interval check is wraparound-safe on a 32-bit ms counter
//!
//! ```no_run
//! use thermoguard_core::{AlarmClassifier, MonitorConfig, MonitorState};
//!
//! let config = MonitorConfig::default();
//! let classifier = AlarmClassifier::new(config.thresholds);
//!
//! let next = classifier.classify_reading(MonitorState::Idle, 31.0).next;
//! assert_eq!(next, MonitorState::PreAlarm);
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod classifier;
pub mod config;
pub mod constants;
pub mod errors;
pub mod heartbeat;
pub mod message;
pub mod monitor;
pub mod notification;
pub mod sampler;
pub mod state;
pub mod time;
pub mod traits;
pub mod trigger;

// Public API
pub use classifier::{AlarmClassifier, Classification, Effect};
pub use config::{ConfigStore, MonitorConfig, Thresholds};
pub use errors::{ConfigError, SendError, SensorError, TriggerBusy};
pub use monitor::{LoopPhase, MonitorLoop, RestartReason, TickReport};
pub use notification::{NotificationGate, NotificationKind};
pub use sampler::{SampleOutcome, TemperatureSampler};
pub use state::MonitorState;
pub use traits::{Connectivity, TemperatureSensor, Transport};
pub use trigger::{ConfigModeTrigger, TriggerCell};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
