//! Error Types for the Monitor and its Collaborators
//!
//! ## Design Philosophy
//!
//! Errors are returned from the tick path of a device that runs for months,
//! so they follow the same rules as the rest of the core:
//!
//! 1. **No Heap Allocation**: messages are `&'static str`, payloads are inline.
//! 2. **Copy Semantics**: every error is `Copy` and cheap to log or store.
//! 3. **Local Handling**: none of these errors stop the monitor. Their
//!    effect on the system is fixed by the taxonomy below.
//!
//! ## Taxonomy
//!
//! | Error | Origin | Effect |
//! |-------|--------|--------|
//! | [`SensorError`] | sensor collaborator | counted; the 5th consecutive one escalates to `SensorFailure` |
//! | [`SendError`] | transport collaborator | logged only, never retried, never changes state |
//! | [`ConfigError`] | configuration boundary | configuration rejected before an epoch starts |
//! | [`TriggerBusy`] | debounce cell | the tick is skipped; the next one retries |
//!
//! Connectivity loss is not an error value: the monitor reacts to it by
//! requesting a restart (see [`crate::monitor::RestartReason`]).
//!
//! ```rust
//! use thermoguard_core::errors::SensorError;
//! use thermoguard_core::sampler::SampleOutcome;
//!
//! fn describe(outcome: SampleOutcome) -> &'static str {
//!     match outcome {
//!         SampleOutcome::Reading(_) => "ok",
//!         SampleOutcome::Fault(SensorError::Disconnected) => "check the wiring",
//!         SampleOutcome::Fault(_) => "transient fault",
//!     }
//! }
//! # assert_eq!(describe(SampleOutcome::Reading(21.0)), "ok");
//! ```

use thiserror_no_std::Error;

/// Failure reading the temperature sensor
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Device did not answer (driver returned the disconnected sentinel)
    #[error("Sensor disconnected")]
    Disconnected,

    /// Value makes no physical sense (NaN, infinity)
    #[error("Invalid value: not a valid number")]
    InvalidValue,

    /// Bus-level failure reported by the driver
    #[error("Sensor bus error: {reason}")]
    Bus {
        /// Driver-provided cause
        reason: &'static str,
    },
}

/// Failure handing a notification to the transport
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// No network path to the mail server
    #[error("Not connected")]
    NotConnected,

    /// Server refused the message
    #[error("Message rejected: {reason}")]
    Rejected {
        /// Why the server refused it
        reason: &'static str,
    },

    /// Session failed mid-transfer
    #[error("Transport error: {reason}")]
    Transport {
        /// What went wrong
        reason: &'static str,
    },
}

/// Configuration rejected at the boundary
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Pre-alarm threshold must be strictly below the alarm threshold
    #[error("Pre-alarm threshold {pre_alarm} must be below alarm threshold {alarm}")]
    ThresholdOrder {
        /// Configured pre-alarm threshold (°C)
        pre_alarm: f32,
        /// Configured alarm threshold (°C)
        alarm: f32,
    },

    /// Reset hysteresis must be a positive number of degrees
    #[error("Reset hysteresis {value} must be greater than zero")]
    NonPositiveHysteresis {
        /// Configured hysteresis (°C)
        value: f32,
    },

    /// An interval was configured as zero
    #[error("Interval '{field}' must be greater than zero")]
    ZeroInterval {
        /// Offending key
        field: &'static str,
    },

    /// A temperature field is NaN or infinite
    #[error("Field '{field}' is not a valid number")]
    InvalidValue {
        /// Offending key
        field: &'static str,
    },

    /// A required field is absent from the store
    #[error("Missing configuration field '{field}'")]
    Missing {
        /// Offending key
        field: &'static str,
    },
}

/// The debounce cell was re-entered while another tick held it
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Debounce state is busy")]
pub struct TriggerBusy;

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Disconnected => defmt::write!(fmt, "Sensor disconnected"),
            Self::InvalidValue => defmt::write!(fmt, "Invalid value"),
            Self::Bus { reason } => defmt::write!(fmt, "Bus error: {}", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SendError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotConnected => defmt::write!(fmt, "Not connected"),
            Self::Rejected { reason } => defmt::write!(fmt, "Rejected: {}", reason),
            Self::Transport { reason } => defmt::write!(fmt, "Transport: {}", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ThresholdOrder { pre_alarm, alarm } =>
                defmt::write!(fmt, "Pre-alarm {} not below alarm {}", pre_alarm, alarm),
            Self::NonPositiveHysteresis { value } =>
                defmt::write!(fmt, "Hysteresis {} <= 0", value),
            Self::ZeroInterval { field } =>
                defmt::write!(fmt, "Zero interval: {}", field),
            Self::InvalidValue { field } =>
                defmt::write!(fmt, "Invalid value: {}", field),
            Self::Missing { field } =>
                defmt::write!(fmt, "Missing field: {}", field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_small() {
        // Returned on every faulty tick; keep them register-sized-ish
        assert!(core::mem::size_of::<SensorError>() <= 24);
        assert!(core::mem::size_of::<ConfigError>() <= 24);
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_messages() {
        let err = ConfigError::ThresholdOrder { pre_alarm: 36.0, alarm: 35.0 };
        assert_eq!(err.to_string(), "Pre-alarm threshold 36 must be below alarm threshold 35");

        let err = SendError::Rejected { reason: "mailbox full" };
        assert_eq!(err.to_string(), "Message rejected: mailbox full");
    }
}
