//! Time-Related Constants
//!
//! All intervals are expressed in milliseconds of the 32-bit monotonic
//! counter, so every default must stay well below `u32::MAX` (~49.7 days).

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u32 = 1000;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Minutes per hour.
pub const MINUTES_PER_HOUR: u32 = 60;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u32 = MS_PER_SECOND * SECONDS_PER_MINUTE;

/// Milliseconds per hour.
pub const MS_PER_HOUR: u32 = MS_PER_MINUTE * MINUTES_PER_HOUR;

// ===== DEFAULT INTERVALS =====

/// Default spacing between temperature samples (milliseconds).
///
/// Server-room air changes slowly; one reading a minute is the factory
/// setting of the reference node.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 60 * MS_PER_SECOND;

/// Default minimum spacing between repeated notifications of one kind (milliseconds).
pub const DEFAULT_NOTIFICATION_INTERVAL_MS: u32 = 10 * MS_PER_MINUTE;

/// Default spacing between "still alive" notifications (milliseconds).
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u32 = 30 * MS_PER_HOUR;

/// Maximum time the boot sequence waits for network association (milliseconds).
pub const NETWORK_CONNECT_TIMEOUT_MS: u32 = 30 * MS_PER_SECOND;

const _: () = assert!(DEFAULT_HEARTBEAT_INTERVAL_MS < u32::MAX / 2);
