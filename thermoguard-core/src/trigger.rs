//! Configuration-mode trigger (button debounce)
//!
//! A push button is sampled on its own fast tick (100 ms on the reference
//! node), independent of the temperature cadence. Holding it for
//! `hold_count` consecutive ticks requests the configuration session:
//!
//! ```text
//! level:   held held held ... held  released held ...
//! counter:  1    2    3   ...  30       0      1
//!                              ▲
//!                              fire once, then latch
//! ```
//!
//! After firing, the trigger latches and ignores the input until
//! [`ConfigModeTrigger::reset`] is called, so holding the button inside a
//! configuration session cannot request a second one.
//!
//! The debounce state is the only state shared between the fast tick and
//! the monitor loop. [`TriggerCell`] serialises the two: each access takes a
//! single-entry guard and a re-entrant access is refused instead of
//! interleaved.

use core::cell::RefCell;

use crate::errors::TriggerBusy;

/// Debounced one-shot trigger
#[derive(Debug, Clone)]
pub struct ConfigModeTrigger {
    hold_count: u32,
    held_level: bool,
    counter: u32,
    latched: bool,
    pending: bool,
}

impl ConfigModeTrigger {
    /// Active-low input, as wired with a pull-up on the reference node
    pub fn new(hold_count: u32) -> Self {
        Self::with_held_level(hold_count, false)
    }

    /// Trigger on `held_level` instead of low
    pub fn with_held_level(hold_count: u32, held_level: bool) -> Self {
        Self {
            hold_count: hold_count.max(1),
            held_level,
            counter: 0,
            latched: false,
            pending: false,
        }
    }

    /// Feed one sampled input level; returns true on the tick that fires
    pub fn on_tick(&mut self, level: bool) -> bool {
        if self.latched {
            return false;
        }

        if level != self.held_level {
            self.counter = 0;
            return false;
        }

        self.counter += 1;
        if self.counter >= self.hold_count {
            self.latched = true;
            self.pending = true;
            log_info!("Configuration mode requested after {} held ticks", self.counter);
            return true;
        }

        false
    }

    /// Consume the request, if one is waiting
    pub fn take_request(&mut self) -> bool {
        core::mem::replace(&mut self.pending, false)
    }

    /// A request fired and was not taken yet
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Fired since the last reset
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Consecutive held ticks so far
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Clear the debounce state and re-enable triggering
    pub fn reset(&mut self) {
        self.counter = 0;
        self.latched = false;
        self.pending = false;
    }
}

/// Single-entry shared cell around a [`ConfigModeTrigger`]
///
/// Both tick sources hold a `&TriggerCell`; neither may hold the guard
/// across a call into the other.
#[derive(Debug)]
pub struct TriggerCell {
    inner: RefCell<ConfigModeTrigger>,
}

impl TriggerCell {
    /// Wrap a trigger for sharing between the two ticks
    pub fn new(trigger: ConfigModeTrigger) -> Self {
        Self {
            inner: RefCell::new(trigger),
        }
    }

    /// Fast-tick entry point
    pub fn on_tick(&self, level: bool) -> Result<bool, TriggerBusy> {
        let mut trigger = self.inner.try_borrow_mut().map_err(|_| TriggerBusy)?;
        Ok(trigger.on_tick(level))
    }

    /// Loop entry point: acknowledge a pending request
    pub fn take_request(&self) -> Result<bool, TriggerBusy> {
        let mut trigger = self.inner.try_borrow_mut().map_err(|_| TriggerBusy)?;
        Ok(trigger.take_request())
    }

    /// Run `f` with exclusive access to the trigger
    pub fn with<R>(&self, f: impl FnOnce(&mut ConfigModeTrigger) -> R) -> Result<R, TriggerBusy> {
        let mut trigger = self.inner.try_borrow_mut().map_err(|_| TriggerBusy)?;
        Ok(f(&mut trigger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELD: bool = false;
    const RELEASED: bool = true;

    #[test]
    fn short_press_does_not_fire() {
        let mut trigger = ConfigModeTrigger::new(30);
        for _ in 0..29 {
            assert!(!trigger.on_tick(HELD));
        }
        assert!(!trigger.on_tick(RELEASED));
        assert_eq!(trigger.counter(), 0);
        assert!(!trigger.is_pending());
    }

    #[test]
    fn long_press_fires_exactly_once() {
        let mut trigger = ConfigModeTrigger::new(30);
        let fired = (0..30).filter(|_| trigger.on_tick(HELD)).count();
        assert_eq!(fired, 1);

        // Tick 31, still held, latched
        assert!(!trigger.on_tick(HELD));
        assert!(trigger.take_request());
        assert!(!trigger.take_request());

        // Still latched after acknowledgement until reset
        assert!((0..60).all(|_| !trigger.on_tick(HELD)));
    }

    #[test]
    fn release_restarts_count() {
        let mut trigger = ConfigModeTrigger::new(3);
        trigger.on_tick(HELD);
        trigger.on_tick(HELD);
        trigger.on_tick(RELEASED);
        assert!(!trigger.on_tick(HELD));
        assert!(!trigger.on_tick(HELD));
        assert!(trigger.on_tick(HELD));
    }

    #[test]
    fn reset_rearms() {
        let mut trigger = ConfigModeTrigger::new(2);
        trigger.on_tick(HELD);
        assert!(trigger.on_tick(HELD));
        trigger.reset();
        assert!(!trigger.is_latched());
        trigger.on_tick(HELD);
        assert!(trigger.on_tick(HELD));
    }

    #[test]
    fn active_high_input() {
        let mut trigger = ConfigModeTrigger::with_held_level(2, true);
        assert!(!trigger.on_tick(false));
        assert!(!trigger.on_tick(true));
        assert!(trigger.on_tick(true));
    }

    #[test]
    fn cell_refuses_reentry() {
        let cell = TriggerCell::new(ConfigModeTrigger::new(1));
        let nested = cell.with(|_| cell.on_tick(HELD));
        assert_eq!(nested, Ok(Err(TriggerBusy)));

        assert_eq!(cell.on_tick(HELD), Ok(true));
        assert_eq!(cell.take_request(), Ok(true));
    }
}
