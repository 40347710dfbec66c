//! Collaborator Traits
//!
//! The monitor owns the decision logic only. Everything that touches
//! hardware or the network sits behind one of these traits and is invoked
//! synchronously from the monitor loop:
//!
//! - [`TemperatureSensor`] - the 1-Wire probe
//! - [`Connectivity`] - network association
//! - [`Transport`] - the mail session that delivers notifications
//!
//! Implementations may block for as long as they need; the loop imposes no
//! timeout on them.
//!
//! ## Usage Example
//!
//! ```rust
//! use thermoguard_core::errors::SensorError;
//! use thermoguard_core::traits::TemperatureSensor;
//!
//! struct Probe {
//!     last: f32,
//! }
//!
//! impl TemperatureSensor for Probe {
//!     fn read_temperature(&mut self) -> Result<f32, SensorError> {
//!         Ok(self.last)
//!     }
//! }
//! ```

pub mod sensor;
pub mod network;

pub use sensor::TemperatureSensor;
pub use network::{Connectivity, Transport};
