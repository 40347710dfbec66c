//! Epoch supervisor
//!
//! Drives one [`MonitorLoop`] per epoch on a single tokio scheduler:
//!
//! ```text
//! load settings ──► connect (bounded wait) ──► tick until Restart ──┐
//!       ▲                                                           │
//!       └──────────────────── restart delay ◄──────────────────────┘
//! ```
//!
//! Within an epoch two intervals interleave in one `select!`: the fast
//! debounce tick feeding the button level into the [`TriggerCell`], and the
//! loop tick calling [`MonitorLoop::tick`]. Both run on the same task, so
//! the cell is never touched concurrently.

use std::time::Duration;

use async_trait::async_trait;
use thermoguard_core::config::MonitorConfig;
use thermoguard_core::constants::time::NETWORK_CONNECT_TIMEOUT_MS;
use thermoguard_core::constants::DEBOUNCE_TICK_MS;
use thermoguard_core::monitor::{LoopPhase, MonitorLoop, RestartReason};
use thermoguard_core::state::MonitorState;
use thermoguard_core::time::{TimeSource, Timestamp};
use thermoguard_core::traits::{Connectivity, TemperatureSensor, Transport};
use thermoguard_core::trigger::{ConfigModeTrigger, TriggerCell};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config_store::SettingsSource;
use crate::sim::ButtonInput;
use crate::ConnectorError;

/// Operator configuration session
///
/// Runs while monitoring is suspended. Whatever it changes is picked up by
/// the next epoch's settings load.
#[async_trait]
pub trait ConfigSession: Send {
    async fn run(&mut self, current: &MonitorConfig) -> Result<(), ConnectorError>;
}

/// Session that changes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

#[async_trait]
impl ConfigSession for NoSession {
    async fn run(&mut self, _current: &MonitorConfig) -> Result<(), ConnectorError> {
        log::info!("Configuration session requested, nothing to configure");
        Ok(())
    }
}

/// Millisecond counter on the tokio clock, truncated to 32 bits
///
/// Follows tokio's paused clock in tests.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn start() -> Self {
        Self { origin: Instant::now() }
    }
}

impl TimeSource for TokioClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }
}

/// Scheduling knobs
#[derive(Debug, Clone)]
pub struct SupervisorOptions {
    /// Period of the monitor loop tick
    pub loop_tick: Duration,
    /// Period of the button debounce tick
    pub debounce_tick: Duration,
    /// Upper bound on waiting for the network at epoch start
    pub connect_timeout: Duration,
    /// Link poll period while waiting
    pub connect_poll: Duration,
    /// Pause between epochs
    pub restart_delay: Duration,
    /// Stop after this many epochs; `None` runs forever
    pub max_epochs: Option<u32>,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            loop_tick: Duration::from_secs(1),
            debounce_tick: Duration::from_millis(u64::from(DEBOUNCE_TICK_MS)),
            connect_timeout: Duration::from_millis(u64::from(NETWORK_CONNECT_TIMEOUT_MS)),
            connect_poll: Duration::from_millis(500),
            restart_delay: Duration::from_secs(2),
            max_epochs: None,
        }
    }
}

impl SupervisorOptions {
    pub fn loop_tick(mut self, period: Duration) -> Self {
        self.loop_tick = period;
        self
    }

    pub fn debounce_tick(mut self, period: Duration) -> Self {
        self.debounce_tick = period;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn max_epochs(mut self, epochs: u32) -> Self {
        self.max_epochs = Some(epochs);
        self
    }
}

/// How an epoch went
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSummary {
    /// 1-based epoch number
    pub index: u32,
    pub reason: RestartReason,
    /// Whether the network came up within the connect timeout
    pub connected: bool,
    /// Monitor loop ticks run
    pub ticks: u64,
    /// Notifications attempted (delivered or not)
    pub notifications: usize,
    pub final_state: MonitorState,
}

/// Owns the collaborators and restarts the monitor after every epoch
pub struct Supervisor<Src, S, C, T, B, K> {
    settings: Src,
    sensor: S,
    connectivity: C,
    transport: T,
    button: B,
    session: K,
    options: SupervisorOptions,
    epochs: u32,
}

impl<Src, S, C, T, B, K> Supervisor<Src, S, C, T, B, K>
where
    Src: SettingsSource,
    S: TemperatureSensor,
    C: Connectivity,
    T: Transport,
    B: ButtonInput,
    K: ConfigSession,
{
    pub fn new(
        settings: Src,
        sensor: S,
        connectivity: C,
        transport: T,
        button: B,
        session: K,
        options: SupervisorOptions,
    ) -> Self {
        Self {
            settings,
            sensor,
            connectivity,
            transport,
            button,
            session,
            options,
            epochs: 0,
        }
    }

    /// Run epochs back to back; returns the number run once
    /// `max_epochs` is reached
    pub async fn run(&mut self) -> u32 {
        loop {
            let summary = self.run_epoch().await;
            log::info!(
                "Epoch {} ended ({:?}) after {} ticks, {} notifications",
                summary.index,
                summary.reason,
                summary.ticks,
                summary.notifications
            );

            if self.options.max_epochs.is_some_and(|max| self.epochs >= max) {
                return self.epochs;
            }
            time::sleep(self.options.restart_delay).await;
        }
    }

    /// One epoch: fresh configuration, fresh monitor, run until restart
    pub async fn run_epoch(&mut self) -> EpochSummary {
        self.epochs += 1;
        let index = self.epochs;

        let config = match self.settings.load() {
            Ok(config) => config,
            Err(err) => {
                log::error!("Stored settings unusable ({}), using factory defaults", err);
                MonitorConfig::default()
            }
        };

        let connected = self.connect().await;

        let clock = TokioClock::start();
        let trigger = TriggerCell::new(ConfigModeTrigger::new(config.trigger_hold_count));
        let mut monitor = MonitorLoop::new(
            config,
            &mut self.sensor,
            &mut self.connectivity,
            &mut self.transport,
            clock.now(),
        );

        let mut debounce = time::interval(self.options.debounce_tick);
        debounce.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut main = time::interval(self.options.loop_tick);
        main.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut ticks = 0u64;
        let mut notifications = 0usize;

        loop {
            tokio::select! {
                _ = debounce.tick() => {
                    if let Err(busy) = trigger.on_tick(self.button.level()) {
                        log::debug!("Debounce tick skipped: {}", busy);
                    }
                }
                _ = main.tick() => {
                    let report = monitor.tick(clock.now(), &trigger);
                    ticks += 1;
                    notifications += report.dispatched.len();

                    if report.phase == LoopPhase::ConfiguringSession {
                        if let Err(err) = self.session.run(monitor.config()).await {
                            log::warn!("Configuration session failed: {}", err);
                        }
                        monitor.complete_configuration();
                    }
                }
            }

            if let LoopPhase::Restart(reason) = monitor.phase() {
                return EpochSummary {
                    index,
                    reason,
                    connected,
                    ticks,
                    notifications,
                    final_state: monitor.state(),
                };
            }
        }
    }

    /// Associate, then wait up to `connect_timeout` for the link
    ///
    /// A timeout is logged and the epoch continues unconnected; the first
    /// connectivity check then ends it.
    async fn connect(&mut self) -> bool {
        if self.connectivity.connect() {
            log::info!("Network connected");
            return true;
        }

        let poll = self.options.connect_poll;
        let link = &self.connectivity;
        let wait = async {
            loop {
                time::sleep(poll).await;
                if link.is_connected() {
                    break;
                }
            }
        };

        match time::timeout(self.options.connect_timeout, wait).await {
            Ok(()) => {
                log::info!("Network connected");
                true
            }
            Err(_) => {
                log::error!(
                    "Network connect timeout after {:?}, check the network configuration",
                    self.options.connect_timeout
                );
                false
            }
        }
    }

    pub fn epochs(&self) -> u32 {
        self.epochs
    }

    pub fn settings(&self) -> &Src {
        &self.settings
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn connectivity(&self) -> &C {
        &self.connectivity
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn session(&self) -> &K {
        &self.session
    }
}
