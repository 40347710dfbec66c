//! Temperature sensor abstraction

use crate::errors::SensorError;

/// Source of temperature readings
///
/// Implementations may return the raw driver value, including the
/// disconnected sentinel; the sampler maps it to a fault.
pub trait TemperatureSensor {
    /// Take one reading in degrees Celsius
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

impl<S: TemperatureSensor + ?Sized> TemperatureSensor for &mut S {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        (**self).read_temperature()
    }
}
