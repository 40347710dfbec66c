//! Monitor loop orchestration
//!
//! ## Overview
//!
//! [`MonitorLoop`] owns the authoritative [`MonitorState`] and every
//! per-epoch counter, and runs the components once per tick:
//!
//! ```text
//! trigger? ──► sample due? ──► sample ──► classify ──► edge notifications
//!                                                          │
//!          connectivity ◄── heartbeat ◄── failure reminder ◄┘
//! ```
//!
//! ## Process phases
//!
//! ```text
//! Running ──button──► ConfiguringSession ──session done──► Restart
//!    │                                                        ▲
//!    └──────────────── link lost ─────────────────────────────┘
//! ```
//!
//! `Restart` is terminal. The caller re-initialises the whole monitor
//! (fresh state, fresh configuration load); nothing is repaired in place.
//!
//! ## Edges and levels
//!
//! `PreAlarm`, `Alarm` and `AlarmReset` notify on the tick a state is
//! entered. `SensorFailure` notifies on every tick spent in the state,
//! throttled by the gate, so a human keeps getting reminders while the
//! sensor is dead.
//!
//! ## Example
//!
//! ```rust
//! use thermoguard_core::{
//!     config::MonitorConfig,
//!     errors::{SendError, SensorError},
//!     message::Message,
//!     monitor::MonitorLoop,
//!     state::MonitorState,
//!     traits::{Connectivity, TemperatureSensor, Transport},
//!     trigger::{ConfigModeTrigger, TriggerCell},
//! };
//!
//! struct Probe(f32);
//! impl TemperatureSensor for Probe {
//!     fn read_temperature(&mut self) -> Result<f32, SensorError> { Ok(self.0) }
//! }
//!
//! struct Link;
//! impl Connectivity for Link {
//!     fn connect(&mut self) -> bool { true }
//!     fn is_connected(&self) -> bool { true }
//! }
//!
//! struct Mail(usize);
//! impl Transport for Mail {
//!     fn send(&mut self, _message: &Message) -> Result<(), SendError> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! let config = MonitorConfig::default();
//! let trigger = TriggerCell::new(ConfigModeTrigger::new(config.trigger_hold_count));
//! let mut monitor = MonitorLoop::new(config, Probe(36.0), Link, Mail(0), 0);
//!
//! let report = monitor.tick(0, &trigger);
//! assert_eq!(report.state, MonitorState::Alarm);
//! assert_eq!(monitor.transport().0, 1);
//! ```

use heapless::Vec;

use crate::classifier::{AlarmClassifier, Effect};
use crate::config::MonitorConfig;
use crate::heartbeat::HeartbeatScheduler;
use crate::message::{render, MessageContext};
use crate::notification::{NotificationGate, NotificationKind, KIND_COUNT};
use crate::sampler::{SampleOutcome, TemperatureSampler};
use crate::state::MonitorState;
use crate::time::{elapsed, Timestamp};
use crate::traits::{Connectivity, TemperatureSensor, Transport};
use crate::trigger::TriggerCell;

/// Why the epoch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartReason {
    /// Network link dropped; the stack is not trusted to recover in place
    ConnectivityLost,
    /// A configuration session finished; new settings need a fresh epoch
    ConfigurationApplied,
}

/// Process-level phase of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Sampling and notifying
    Running,
    /// Monitoring suspended while the operator configures the node
    ConfiguringSession,
    /// Terminal: the caller must start a new epoch
    Restart(RestartReason),
}

/// One notification the loop decided to send this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// Kind attempted
    pub kind: NotificationKind,
    /// Whether the transport accepted it; failures are not retried
    pub delivered: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Phase after the tick
    pub phase: LoopPhase,
    /// State after the tick
    pub state: MonitorState,
    /// State before the tick
    pub previous_state: MonitorState,
    /// Present on ticks where the sensor was sampled
    pub sample: Option<SampleOutcome>,
    /// Notifications attempted, in order
    pub dispatched: Vec<Dispatch, KIND_COUNT>,
}

impl TickReport {
    /// Whether `kind` was attempted this tick
    pub fn sent(&self, kind: NotificationKind) -> bool {
        self.dispatched.iter().any(|d| d.kind == kind)
    }
}

/// The monitor for one epoch
pub struct MonitorLoop<S, C, T> {
    config: MonitorConfig,
    sampler: TemperatureSampler<S>,
    connectivity: C,
    transport: T,
    classifier: AlarmClassifier,
    gate: NotificationGate,
    heartbeat: HeartbeatScheduler,
    state: MonitorState,
    previous_state: MonitorState,
    phase: LoopPhase,
    last_sample: Option<Timestamp>,
    last_reading: Option<f32>,
    last_tick: Timestamp,
    uptime_ms: u64,
}

impl<S, C, T> MonitorLoop<S, C, T>
where
    S: TemperatureSensor,
    C: Connectivity,
    T: Transport,
{
    /// Start an epoch at counter value `start`
    ///
    /// `config` is assumed validated (see [`MonitorConfig::validate`]).
    pub fn new(config: MonitorConfig, sensor: S, connectivity: C, transport: T, start: Timestamp) -> Self {
        Self {
            classifier: AlarmClassifier::new(config.thresholds),
            gate: NotificationGate::new(config.notification_interval),
            heartbeat: HeartbeatScheduler::new(config.heartbeat_interval, start),
            config,
            sampler: TemperatureSampler::new(sensor),
            connectivity,
            transport,
            state: MonitorState::Idle,
            previous_state: MonitorState::Idle,
            phase: LoopPhase::Running,
            last_sample: None,
            last_reading: None,
            last_tick: start,
            uptime_ms: 0,
        }
    }

    /// Run one iteration of the loop at counter value `now`
    pub fn tick(&mut self, now: Timestamp, trigger: &TriggerCell) -> TickReport {
        self.uptime_ms += u64::from(elapsed(self.last_tick, now));
        self.last_tick = now;

        let previous = self.state;
        let mut report = TickReport {
            phase: self.phase,
            state: self.state,
            previous_state: previous,
            sample: None,
            dispatched: Vec::new(),
        };

        if self.phase != LoopPhase::Running {
            return report;
        }

        match trigger.take_request() {
            Ok(true) => {
                self.enter_configuration();
                self.previous_state = previous;
                report.phase = self.phase;
                report.state = self.state;
                return report;
            }
            Ok(false) => {}
            Err(_busy) => log_debug!("Trigger busy, checking again next tick"),
        }

        if self.sample_due(now) {
            self.last_sample = Some(now);
            let outcome = self.sample_and_classify();
            report.sample = Some(outcome);
            self.notify_edges(previous, now, &mut report);
        }

        if self.state == MonitorState::SensorFailure {
            self.notify(NotificationKind::SensorFailure, now, &mut report);
        }

        if self.heartbeat.should_send_heartbeat(now) {
            self.heartbeat.record_sent(now);
            self.gate.record_sent(NotificationKind::Heartbeat, now);
            self.dispatch(NotificationKind::Heartbeat, &mut report);
        }

        if !self.connectivity.is_connected() {
            log_error!("Network connection lost, restart required");
            self.phase = LoopPhase::Restart(RestartReason::ConnectivityLost);
        }

        self.previous_state = previous;
        report.phase = self.phase;
        report.state = self.state;
        report
    }

    /// Mark the configuration session as finished; the epoch ends
    pub fn complete_configuration(&mut self) {
        if self.phase == LoopPhase::ConfiguringSession {
            log_info!("Configuration session completed, restarting");
            self.phase = LoopPhase::Restart(RestartReason::ConfigurationApplied);
        }
    }

    fn enter_configuration(&mut self) {
        log_info!("Entering configuration session from {}", self.state);
        self.state = MonitorState::ConfigRequested;
        self.phase = LoopPhase::ConfiguringSession;
    }

    fn sample_due(&self, now: Timestamp) -> bool {
        match self.last_sample {
            None => true,
            Some(last) => elapsed(last, now) >= self.config.sample_interval,
        }
    }

    fn sample_and_classify(&mut self) -> SampleOutcome {
        let outcome = self.sampler.sample();
        if let Some(celsius) = outcome.reading() {
            self.last_reading = Some(celsius);
            log_debug!("Temperature: {:.2} °C", celsius);
        }

        let classification =
            self.classifier
                .classify(self.state, outcome, self.sampler.consecutive_faults());

        match classification.effect {
            Effect::None => {}
            Effect::Escalated => {
                if self.state != MonitorState::SensorFailure {
                    log_error!(
                        "{} consecutive sensor faults, entering SENSOR_FAILURE",
                        self.sampler.consecutive_faults()
                    );
                }
                self.sampler.reset_faults();
            }
            Effect::Recovered => {
                log_info!("Sensor recovered");
                self.gate.rearm(NotificationKind::SensorFailure);
            }
            Effect::AlarmCleared => {
                self.gate.rearm(NotificationKind::PreAlarm);
                self.gate.rearm(NotificationKind::Alarm);
            }
        }

        if classification.next != self.state {
            log_info!("State {} -> {}", self.state, classification.next);
        }
        self.state = classification.next;
        outcome
    }

    fn notify_edges(&mut self, previous: MonitorState, now: Timestamp, report: &mut TickReport) {
        if previous == self.state {
            return;
        }

        match self.state {
            MonitorState::PreAlarm => self.notify(NotificationKind::PreAlarm, now, report),
            MonitorState::Alarm => self.notify(NotificationKind::Alarm, now, report),
            MonitorState::Idle if previous.is_temperature_alarm() => {
                self.notify(NotificationKind::AlarmReset, now, report)
            }
            _ => {}
        }
    }

    fn notify(&mut self, kind: NotificationKind, now: Timestamp, report: &mut TickReport) {
        if !self.gate.should_notify(kind, now) {
            log_debug!("{} notification throttled", kind);
            return;
        }
        self.gate.record_sent(kind, now);
        self.dispatch(kind, report);
    }

    fn dispatch(&mut self, kind: NotificationKind, report: &mut TickReport) {
        let ctx = MessageContext {
            last_reading: self.last_reading,
            uptime_secs: self.uptime_secs(),
            heartbeat_interval: self.heartbeat.interval(),
        };

        let delivered = match render(kind, &ctx) {
            Ok(message) => match self.transport.send(&message) {
                Ok(()) => {
                    log_info!("{} notification sent", kind);
                    true
                }
                Err(_err) => {
                    log_warn!("{} notification failed: {}", kind, _err);
                    false
                }
            },
            Err(_) => {
                log_error!("{} notification body does not fit, not sent", kind);
                false
            }
        };

        // Capacity covers every kind; at most three fire per tick
        let _ = report.dispatched.push(Dispatch { kind, delivered });
    }

    /// Current monitor state
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// State before the most recent tick
    pub fn previous_state(&self) -> MonitorState {
        self.previous_state
    }

    /// Current process phase
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Configuration this epoch runs with
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Throttling ledger
    pub fn gate(&self) -> &NotificationGate {
        &self.gate
    }

    /// Failed reads since the last good one
    pub fn consecutive_faults(&self) -> u32 {
        self.sampler.consecutive_faults()
    }

    /// Most recent valid temperature (°C)
    pub fn last_reading(&self) -> Option<f32> {
        self.last_reading
    }

    /// Seconds since the epoch started
    pub fn uptime_secs(&self) -> u64 {
        self.uptime_ms / 1000
    }

    /// Sensor collaborator
    pub fn sensor_mut(&mut self) -> &mut S {
        self.sampler.sensor_mut()
    }

    /// Link collaborator
    pub fn connectivity(&self) -> &C {
        &self.connectivity
    }

    /// Link collaborator, mutable
    pub fn connectivity_mut(&mut self) -> &mut C {
        &mut self.connectivity
    }

    /// Transport collaborator
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Transport collaborator, mutable
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{SendError, SensorError};
    use crate::message::Message;
    use crate::trigger::ConfigModeTrigger;

    use std::vec::Vec as StdVec;

    const MINUTE: u32 = 60_000;

    struct Script {
        readings: StdVec<Result<f32, SensorError>>,
        next: usize,
    }

    impl TemperatureSensor for Script {
        fn read_temperature(&mut self) -> Result<f32, SensorError> {
            let reading = self.readings[self.next.min(self.readings.len() - 1)];
            self.next += 1;
            reading
        }
    }

    struct Link(bool);

    impl Connectivity for Link {
        fn connect(&mut self) -> bool {
            self.0
        }
        fn is_connected(&self) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct Outbox {
        sent: StdVec<NotificationKind>,
        fail: bool,
    }

    impl Transport for Outbox {
        fn send(&mut self, message: &Message) -> Result<(), SendError> {
            self.sent.push(message.kind);
            if self.fail {
                Err(SendError::NotConnected)
            } else {
                Ok(())
            }
        }
    }

    fn monitor(readings: StdVec<Result<f32, SensorError>>) -> MonitorLoop<Script, Link, Outbox> {
        let config = MonitorConfig::builder()
            .pre_alarm(30.0)
            .alarm(35.0)
            .reset_hysteresis(1.0)
            .sample_interval(MINUTE)
            .notification_interval(10 * MINUTE)
            .without_heartbeat()
            .build()
            .unwrap();
        MonitorLoop::new(config, Script { readings, next: 0 }, Link(true), Outbox::default(), 0)
    }

    fn trigger() -> TriggerCell {
        TriggerCell::new(ConfigModeTrigger::new(30))
    }

    #[test]
    fn samples_on_first_tick_then_on_interval() {
        let mut m = monitor(vec![Ok(20.0)]);
        let t = trigger();

        assert!(m.tick(0, &t).sample.is_some());
        assert!(m.tick(MINUTE - 1, &t).sample.is_none());
        assert!(m.tick(MINUTE, &t).sample.is_some());
    }

    #[test]
    fn send_failure_does_not_change_state_or_retry() {
        let mut m = monitor(vec![Ok(36.0)]);
        m.transport_mut().fail = true;
        let t = trigger();

        let report = m.tick(0, &t);
        assert_eq!(report.state, MonitorState::Alarm);
        assert_eq!(report.dispatched[0], Dispatch { kind: NotificationKind::Alarm, delivered: false });

        // Still in alarm, no re-entry edge, no retry
        let report = m.tick(MINUTE, &t);
        assert!(report.dispatched.is_empty());
        assert_eq!(m.transport().sent.len(), 1);
    }

    #[test]
    fn connectivity_loss_is_terminal() {
        let mut m = monitor(vec![Ok(20.0)]);
        let t = trigger();
        m.connectivity_mut().0 = false;

        let report = m.tick(0, &t);
        assert_eq!(report.phase, LoopPhase::Restart(RestartReason::ConnectivityLost));

        m.connectivity_mut().0 = true;
        let report = m.tick(MINUTE, &t);
        assert!(report.sample.is_none());
        assert_eq!(m.phase(), LoopPhase::Restart(RestartReason::ConnectivityLost));
    }

    #[test]
    fn configuration_request_suspends_monitoring() {
        let mut m = monitor(vec![Ok(36.0)]);
        let t = TriggerCell::new(ConfigModeTrigger::new(1));
        t.on_tick(false).unwrap();

        let report = m.tick(0, &t);
        assert_eq!(report.state, MonitorState::ConfigRequested);
        assert_eq!(report.phase, LoopPhase::ConfiguringSession);
        assert!(report.sample.is_none());

        let report = m.tick(10 * MINUTE, &t);
        assert!(report.sample.is_none());
        assert!(m.transport().sent.is_empty());

        m.complete_configuration();
        assert_eq!(m.phase(), LoopPhase::Restart(RestartReason::ConfigurationApplied));
    }

    #[test]
    fn uptime_accumulates_across_wrap() {
        let start = u32::MAX - 999;
        let config = MonitorConfig::builder().without_heartbeat().build().unwrap();
        let mut m = MonitorLoop::new(
            config,
            Script { readings: vec![Ok(20.0)], next: 0 },
            Link(true),
            Outbox::default(),
            start,
        );
        let t = trigger();

        m.tick(start, &t);
        m.tick(start.wrapping_add(5_000), &t);
        assert_eq!(m.uptime_secs(), 5);
    }
}
