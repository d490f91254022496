//! Per-button press classifier.
//!
//! Turns the stream of debounced samples for one button into discrete
//! events:
//!
//! - **Tap**: the button was released after a press the classifier
//!   observed.
//! - **Repeat**: the button has been held past the initial repeat delay;
//!   fires once, then again each time the hold duration passes the next
//!   repeat deadline. The cadence is driven entirely by the hold
//!   duration, not a wall-clock timer, so it is robust to tick jitter.
//!
//! A press edge that the classifier never saw (because the tick was
//! suppressed by chord handling) is not adopted later: the button stays
//! untracked until it is cleanly released. This is what keeps an aborted
//! profile chord from echoing taps or repeats for its buttons.

use crate::input::debounce::ButtonSample;
use crate::keymap::PressKind;

/// Timing and policy knobs for the classifier, shared by all buttons.
#[derive(Clone, Copy, Debug)]
pub struct ClassifierParams {
    /// Hold time before the first repeat fires (ms).
    pub repeat_delay_ms: u64,
    /// Cadence of subsequent repeat fires (ms).
    pub repeat_interval_ms: u64,
    /// Whether release still fires a tap once repeats have fired.
    pub tap_after_repeat: bool,
}

/// Where a button is in its press cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Released, or pressed without an observed press edge.
    Idle,
    /// Pressed; no repeat has fired yet.
    Pressed,
    /// Held long enough that at least one repeat has fired.
    Repeating,
}

/// Classifier state for a single button.
pub struct Classifier {
    phase: Phase,
    /// Hold duration the next repeat becomes eligible at. `None` while
    /// not armed for auto-repeat.
    next_repeat_ms: Option<u64>,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            next_repeat_ms: None,
        }
    }

    /// Process one sample; at most one event per tick.
    pub fn update(&mut self, sample: ButtonSample, params: &ClassifierParams) -> Option<PressKind> {
        if sample.changed {
            if sample.pressed {
                // Fresh press edge. No event until release or repeat.
                self.phase = Phase::Pressed;
                self.next_repeat_ms = None;
                None
            } else {
                let fire = match self.phase {
                    Phase::Pressed => true,
                    Phase::Repeating => params.tap_after_repeat,
                    Phase::Idle => false,
                };
                self.phase = Phase::Idle;
                self.next_repeat_ms = None;
                fire.then_some(PressKind::Tap)
            }
        } else if sample.pressed {
            if self.phase == Phase::Idle {
                // Press edge happened under suppression; wait for a
                // clean release before tracking this button again.
                return None;
            }
            let held = sample.held_ms;
            let eligible = held > params.repeat_delay_ms
                && self.next_repeat_ms.map_or(true, |next| held > next);
            if eligible {
                self.phase = Phase::Repeating;
                self.next_repeat_ms = Some(held + params.repeat_interval_ms);
                Some(PressKind::Repeat)
            } else {
                None
            }
        } else {
            self.phase = Phase::Idle;
            self.next_repeat_ms = None;
            None
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
