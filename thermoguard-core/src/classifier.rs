//! Alarm classification with hysteresis
//!
//! ## Overview
//!
//! [`AlarmClassifier::classify`] is a pure function from
//! `(current state, sample outcome, consecutive faults)` to the next state.
//! It holds no state of its own beyond the thresholds, so it can be tested
//! exhaustively without any collaborator.
//!
//! ## Rules
//!
//! Evaluated in precedence order:
//!
//! 1. `consecutive_faults >= 5` forces `SensorFailure`, whatever the state.
//! 2. A fault below that count changes nothing.
//! 3. From `SensorFailure`, any reading recovers to `Idle`. One good read
//!    is enough; escalation needs five bad ones.
//! 4. From `Idle`/`PreAlarm`/`Alarm`, `reading >= alarm` enters `Alarm`.
//! 5. From `Idle`/`PreAlarm`, `pre_alarm <= reading < alarm` enters `PreAlarm`.
//! 6. From `PreAlarm`/`Alarm`, `reading <= clear_point` returns to `Idle`
//!    and re-arms the alarm notifications.
//!
//! `ConfigRequested` is absorbing: nothing here leaves it.
//!
//! ## Hysteresis
//!
//! ```text
//!  °C
//!  35 ─ ─ ─ ─ alarm ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─   rising: enter Alarm
//!  30 ─ ─ ─ ─ pre_alarm ─ ─ ─ ─ ─ ─ ─ ─ ─ ─   rising: enter PreAlarm
//!  29 ─ ─ ─ ─ clear_point = min(30,35) - 1 ─   falling: back to Idle
//! ```
//!
//! Once in `Alarm`, a reading that drops into the attention band does not
//! step down to `PreAlarm`; the state holds until the clear point. This is
//! what stops an alarm from chattering when the room hovers at a threshold.

use crate::config::Thresholds;
use crate::constants::FAULT_ESCALATION_THRESHOLD;
use crate::sampler::SampleOutcome;
use crate::state::MonitorState;

/// Side effect attached to a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing beyond the state change (if any)
    None,
    /// Fault count reached the escalation threshold
    Escalated,
    /// First good reading after a sensor failure
    Recovered,
    /// Temperature fell to the clear point; alarm notifications re-arm
    AlarmCleared,
}

/// Outcome of one classification step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// State after this step
    pub next: MonitorState,
    /// Bookkeeping the loop must apply
    pub effect: Effect,
}

impl Classification {
    const fn stay(state: MonitorState) -> Self {
        Self { next: state, effect: Effect::None }
    }
}

/// Maps readings to alarm states
#[derive(Debug, Clone, Copy)]
pub struct AlarmClassifier {
    thresholds: Thresholds,
}

impl AlarmClassifier {
    /// Classifier over validated thresholds
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Decide the next state
    pub fn classify(
        &self,
        current: MonitorState,
        outcome: SampleOutcome,
        consecutive_faults: u32,
    ) -> Classification {
        if current == MonitorState::ConfigRequested {
            return Classification::stay(current);
        }

        if consecutive_faults >= FAULT_ESCALATION_THRESHOLD {
            return Classification {
                next: MonitorState::SensorFailure,
                effect: Effect::Escalated,
            };
        }

        match outcome {
            SampleOutcome::Fault(_) => Classification::stay(current),
            SampleOutcome::Reading(celsius) => self.classify_reading(current, celsius),
        }
    }

    /// Rules for a successful reading
    pub fn classify_reading(&self, current: MonitorState, celsius: f32) -> Classification {
        let t = &self.thresholds;

        match current {
            MonitorState::ConfigRequested => Classification::stay(current),

            MonitorState::SensorFailure => Classification {
                next: MonitorState::Idle,
                effect: Effect::Recovered,
            },

            MonitorState::Idle | MonitorState::PreAlarm | MonitorState::Alarm => {
                if celsius >= t.alarm {
                    return Classification::stay(MonitorState::Alarm);
                }

                if let Some(pre_alarm) = t.pre_alarm {
                    let in_band = celsius >= pre_alarm;
                    if in_band && current != MonitorState::Alarm {
                        return Classification::stay(MonitorState::PreAlarm);
                    }
                }

                if current.is_temperature_alarm() && celsius <= t.clear_point() {
                    return Classification {
                        next: MonitorState::Idle,
                        effect: Effect::AlarmCleared,
                    };
                }

                Classification::stay(current)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SensorError;
    use proptest::prelude::*;

    fn dual() -> AlarmClassifier {
        AlarmClassifier::new(Thresholds {
            pre_alarm: Some(30.0),
            alarm: 35.0,
            reset_hysteresis: 1.0,
        })
    }

    fn single() -> AlarmClassifier {
        AlarmClassifier::new(Thresholds {
            pre_alarm: None,
            alarm: 35.0,
            reset_hysteresis: 2.0,
        })
    }

    fn next(c: &AlarmClassifier, state: MonitorState, celsius: f32) -> MonitorState {
        c.classify_reading(state, celsius).next
    }

    #[test]
    fn rising_edges() {
        let c = dual();
        assert_eq!(next(&c, MonitorState::Idle, 28.0), MonitorState::Idle);
        assert_eq!(next(&c, MonitorState::Idle, 30.0), MonitorState::PreAlarm);
        assert_eq!(next(&c, MonitorState::Idle, 35.0), MonitorState::Alarm);
        assert_eq!(next(&c, MonitorState::PreAlarm, 34.9), MonitorState::PreAlarm);
        assert_eq!(next(&c, MonitorState::PreAlarm, 36.0), MonitorState::Alarm);
    }

    #[test]
    fn alarm_does_not_step_down_to_pre_alarm() {
        let c = dual();
        assert_eq!(next(&c, MonitorState::Alarm, 32.0), MonitorState::Alarm);
        assert_eq!(next(&c, MonitorState::Alarm, 29.5), MonitorState::Alarm);
    }

    #[test]
    fn clears_at_or_below_clear_point() {
        let c = dual();
        let cleared = c.classify_reading(MonitorState::Alarm, 29.0);
        assert_eq!(cleared.next, MonitorState::Idle);
        assert_eq!(cleared.effect, Effect::AlarmCleared);

        let cleared = c.classify_reading(MonitorState::PreAlarm, 28.9);
        assert_eq!(cleared, Classification { next: MonitorState::Idle, effect: Effect::AlarmCleared });

        // Between clear point and pre-alarm: hold
        assert_eq!(next(&c, MonitorState::PreAlarm, 29.5), MonitorState::PreAlarm);
    }

    #[test]
    fn idle_below_clear_point_is_not_a_reset() {
        let c = dual();
        assert_eq!(c.classify_reading(MonitorState::Idle, 10.0), Classification::stay(MonitorState::Idle));
    }

    #[test]
    fn single_threshold_mode() {
        let c = single();
        // No pre-alarm band at all
        assert_eq!(next(&c, MonitorState::Idle, 34.0), MonitorState::Idle);
        assert_eq!(next(&c, MonitorState::Idle, 35.0), MonitorState::Alarm);
        assert_eq!(next(&c, MonitorState::Alarm, 33.5), MonitorState::Alarm);
        assert_eq!(next(&c, MonitorState::Alarm, 33.0), MonitorState::Idle);
    }

    #[test]
    fn escalation_needs_five_faults() {
        let c = dual();
        let fault = SampleOutcome::Fault(SensorError::Disconnected);

        for faults in 1..FAULT_ESCALATION_THRESHOLD {
            let result = c.classify(MonitorState::Alarm, fault, faults);
            assert_eq!(result, Classification::stay(MonitorState::Alarm));
        }

        let result = c.classify(MonitorState::Alarm, fault, FAULT_ESCALATION_THRESHOLD);
        assert_eq!(result.next, MonitorState::SensorFailure);
        assert_eq!(result.effect, Effect::Escalated);
    }

    #[test]
    fn recovery_ignores_thresholds() {
        let c = dual();
        for celsius in [-5.0, 25.0, 31.0, 80.0] {
            let result = c.classify(MonitorState::SensorFailure, SampleOutcome::Reading(celsius), 0);
            assert_eq!(result.next, MonitorState::Idle);
            assert_eq!(result.effect, Effect::Recovered);
        }
    }

    #[test]
    fn config_requested_is_absorbing() {
        let c = dual();
        let fault = SampleOutcome::Fault(SensorError::Disconnected);
        assert_eq!(c.classify(MonitorState::ConfigRequested, fault, 9).next, MonitorState::ConfigRequested);
        assert_eq!(
            c.classify(MonitorState::ConfigRequested, SampleOutcome::Reading(50.0), 0).next,
            MonitorState::ConfigRequested
        );
    }

    proptest! {
        #[test]
        fn alarm_holds_above_clear_point(readings in proptest::collection::vec(29.01f32..40.0, 1..64)) {
            let c = dual();
            let mut state = MonitorState::Alarm;
            for celsius in readings {
                state = next(&c, state, celsius);
                prop_assert_eq!(state, MonitorState::Alarm);
            }
        }

        #[test]
        fn pre_alarm_never_falls_straight_to_idle_above_clear_point(celsius in 29.01f32..35.0) {
            let c = dual();
            prop_assert_eq!(next(&c, MonitorState::PreAlarm, celsius), MonitorState::PreAlarm);
        }
    }
}
