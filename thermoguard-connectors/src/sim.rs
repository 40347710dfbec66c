//! Simulated hardware
//!
//! Stand-ins for the 1-Wire probe, the WiFi link and the push button, for
//! running the monitor on a workstation or in tests.

use std::cell::Cell;
use std::collections::VecDeque;

use thermoguard_core::constants::DEVICE_DISCONNECTED_C;
use thermoguard_core::errors::SensorError;
use thermoguard_core::traits::{Connectivity, TemperatureSensor};

/// Probe that plays a script, then repeats the last entry
#[derive(Debug, Clone)]
pub struct ScriptedSensor {
    script: VecDeque<Result<f32, SensorError>>,
    last: Result<f32, SensorError>,
    reads: u64,
}

impl ScriptedSensor {
    pub fn new(script: impl IntoIterator<Item = Result<f32, SensorError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: Ok(DEVICE_DISCONNECTED_C),
            reads: 0,
        }
    }

    /// Raw driver values, sentinel included
    pub fn raw(values: impl IntoIterator<Item = f32>) -> Self {
        Self::new(values.into_iter().map(Ok))
    }

    pub fn constant(celsius: f32) -> Self {
        Self::raw([celsius])
    }

    /// Probe that reads the disconnected sentinel forever
    pub fn unplugged() -> Self {
        Self::new(std::iter::empty())
    }

    pub fn push(&mut self, reading: Result<f32, SensorError>) {
        self.script.push_back(reading);
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl TemperatureSensor for ScriptedSensor {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// Network link with a scripted lifetime
///
/// `checks_before_drop` counts `is_connected` polls after association;
/// `None` keeps the link up forever.
#[derive(Debug, Clone)]
pub struct SimLink {
    associates: bool,
    connected: Cell<bool>,
    checks_before_drop: Option<u32>,
    checks: Cell<u32>,
    connects: u32,
}

impl SimLink {
    pub fn stable() -> Self {
        Self::with_drop_after(None)
    }

    /// Link that comes up and then drops after `checks` polls
    pub fn dropping_after(checks: u32) -> Self {
        Self::with_drop_after(Some(checks))
    }

    /// Link whose association never succeeds
    pub fn unreachable() -> Self {
        Self {
            associates: false,
            ..Self::stable()
        }
    }

    fn with_drop_after(checks_before_drop: Option<u32>) -> Self {
        Self {
            associates: true,
            connected: Cell::new(false),
            checks_before_drop,
            checks: Cell::new(0),
            connects: 0,
        }
    }

    /// Association attempts so far
    pub fn connects(&self) -> u32 {
        self.connects
    }
}

impl Connectivity for SimLink {
    fn connect(&mut self) -> bool {
        self.connects += 1;
        self.checks.set(0);
        self.connected.set(self.associates);
        self.associates
    }

    fn is_connected(&self) -> bool {
        if !self.connected.get() {
            return false;
        }
        let checks = self.checks.get() + 1;
        self.checks.set(checks);
        if let Some(limit) = self.checks_before_drop {
            if checks > limit {
                log::warn!("Simulated link dropped after {} checks", limit);
                self.connected.set(false);
            }
        }
        self.connected.get()
    }
}

/// Level source for the configuration button
pub trait ButtonInput {
    /// Current pin level; the reference wiring reads low while pressed
    fn level(&mut self) -> bool;
}

/// Button that plays a script of levels, then stays at the last one
#[derive(Debug, Clone)]
pub struct ScriptedButton {
    levels: VecDeque<bool>,
    last: bool,
}

impl ScriptedButton {
    pub fn new(levels: impl IntoIterator<Item = bool>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            last: true,
        }
    }

    /// Never pressed (pull-up keeps the pin high)
    pub fn released() -> Self {
        Self::new(std::iter::empty())
    }

    /// Held down from the first tick
    pub fn held() -> Self {
        Self::new([false])
    }
}

impl ButtonInput for ScriptedButton {
    fn level(&mut self) -> bool {
        if let Some(next) = self.levels.pop_front() {
            self.last = next;
        }
        self.last
    }
}

impl<B: ButtonInput + ?Sized> ButtonInput for &mut B {
    fn level(&mut self) -> bool {
        (**self).level()
    }
}
