//! Sensor Driver Constants

/// Value reported by the 1-Wire temperature driver when the device does
/// not answer on the bus (°C).
///
/// Source: DS18B20 driver convention (`DEVICE_DISCONNECTED_C`)
pub const DEVICE_DISCONNECTED_C: f32 = -127.0;

/// Consecutive failed reads that escalate the monitor to `SensorFailure`.
///
/// Four transient faults are tolerated; the fifth escalates.
pub const FAULT_ESCALATION_THRESHOLD: u32 = 5;
