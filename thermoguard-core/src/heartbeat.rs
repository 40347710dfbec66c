//! Periodic "still alive" notification
//!
//! Independent of the alarm state: it proves to a human that the node is
//! running even when nothing is wrong. The reference point is the start of
//! the epoch, so the first heartbeat goes out one full interval after boot.

use crate::time::{elapsed, Millis, Timestamp};

/// Tracks when the next heartbeat is due
#[derive(Debug, Clone)]
pub struct HeartbeatScheduler {
    interval: Option<Millis>,
    last_heartbeat: Timestamp,
}

impl HeartbeatScheduler {
    /// `interval = None` disables heartbeats
    pub fn new(interval: Option<Millis>, start: Timestamp) -> Self {
        Self {
            interval,
            last_heartbeat: start,
        }
    }

    /// False when the interval is disabled
    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    /// Configured interval (ms)
    pub fn interval(&self) -> Option<Millis> {
        self.interval
    }

    /// More than one interval since the last heartbeat (or the epoch start)
    pub fn should_send_heartbeat(&self, now: Timestamp) -> bool {
        match self.interval {
            Some(interval) => elapsed(self.last_heartbeat, now) > interval,
            None => false,
        }
    }

    /// Restart the interval at `now`
    pub fn record_sent(&mut self, now: Timestamp) {
        self.last_heartbeat = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_interval() {
        let mut heartbeat = HeartbeatScheduler::new(Some(1_000), 0);
        assert!(!heartbeat.should_send_heartbeat(500));
        assert!(!heartbeat.should_send_heartbeat(1_000));
        assert!(heartbeat.should_send_heartbeat(1_001));

        heartbeat.record_sent(1_001);
        assert!(!heartbeat.should_send_heartbeat(1_500));
        assert!(heartbeat.should_send_heartbeat(2_002));
    }

    #[test]
    fn disabled_never_fires() {
        let heartbeat = HeartbeatScheduler::new(None, 0);
        assert!(!heartbeat.is_enabled());
        assert!(!heartbeat.should_send_heartbeat(u32::MAX));
    }

    #[test]
    fn measures_from_epoch_start_across_wrap() {
        let start = u32::MAX - 100;
        let heartbeat = HeartbeatScheduler::new(Some(1_000), start);
        assert!(!heartbeat.should_send_heartbeat(500));
        assert!(heartbeat.should_send_heartbeat(1_000));
    }
}
