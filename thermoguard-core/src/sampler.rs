//! Temperature sampling with fault counting
//!
//! The sampler turns whatever the sensor collaborator returns into a typed
//! [`SampleOutcome`] and keeps the count of consecutive failed reads. It
//! never touches the monitor state; escalation is decided by the caller
//! from [`TemperatureSampler::consecutive_faults`].
//!
//! A read is a fault when the driver reports an error, returns the
//! disconnected sentinel, or returns a non-finite value.

use crate::constants::DEVICE_DISCONNECTED_C;
use crate::errors::SensorError;
use crate::traits::TemperatureSensor;

/// Result of one sampling attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// Valid reading in degrees Celsius
    Reading(f32),
    /// The sensor could not be read
    Fault(SensorError),
}

impl SampleOutcome {
    /// Temperature, if the sample succeeded
    pub fn reading(&self) -> Option<f32> {
        match self {
            SampleOutcome::Reading(celsius) => Some(*celsius),
            SampleOutcome::Fault(_) => None,
        }
    }
}

/// Samples a [`TemperatureSensor`] and counts consecutive faults
#[derive(Debug)]
pub struct TemperatureSampler<S> {
    sensor: S,
    consecutive_faults: u32,
}

impl<S: TemperatureSensor> TemperatureSampler<S> {
    /// Sampler with a clear fault counter
    pub fn new(sensor: S) -> Self {
        Self {
            sensor,
            consecutive_faults: 0,
        }
    }

    /// Read the sensor once
    ///
    /// A fault increments the counter; a reading resets it to zero.
    pub fn sample(&mut self) -> SampleOutcome {
        let outcome = match self.sensor.read_temperature() {
            Ok(celsius) if celsius == DEVICE_DISCONNECTED_C => {
                SampleOutcome::Fault(SensorError::Disconnected)
            }
            Ok(celsius) if !celsius.is_finite() => SampleOutcome::Fault(SensorError::InvalidValue),
            Ok(celsius) => SampleOutcome::Reading(celsius),
            Err(err) => SampleOutcome::Fault(err),
        };

        match outcome {
            SampleOutcome::Reading(_) => self.consecutive_faults = 0,
            SampleOutcome::Fault(_err) => {
                self.consecutive_faults = self.consecutive_faults.saturating_add(1);
                log_warn!("Temperature read failed ({}), {} in a row", _err, self.consecutive_faults);
            }
        }

        outcome
    }

    /// Faults since the last good reading
    pub fn consecutive_faults(&self) -> u32 {
        self.consecutive_faults
    }

    /// Clear the counter, done when the monitor enters `SensorFailure`
    pub fn reset_faults(&mut self) {
        self.consecutive_faults = 0;
    }

    /// Underlying sensor
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}
