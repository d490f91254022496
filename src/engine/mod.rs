//! Input-to-event engine.
//!
//! One [`Engine::tick`] per scheduler tick, fed with the debounced
//! sample of every button. Control flow inside a tick:
//!
//! 1. The profile controller inspects the two chord buttons. If a chord
//!    is in progress (or entering/leaving one), the tick ends here -
//!    chord handling and normal button processing are mutually
//!    exclusive by construction.
//! 2. Otherwise every button's classifier runs and may emit one event.
//!
//! All state lives in the `Engine` struct owned by the tick task; there
//! are no globals and no locking.

pub mod classifier;
pub mod profile;

use crate::config::NUM_BUTTONS;
use crate::error::ConfigError;
use crate::input::debounce::ButtonSample;
use crate::keymap::PressKind;
use classifier::{Classifier, ClassifierParams};
use heapless::Vec;
use profile::ProfileSwitcher;

/// A classified input event, ready for dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: usize,
    pub kind: PressKind,
}

/// Everything the engine needs to know at construction.
#[derive(Clone, Copy, Debug)]
pub struct EngineParams {
    pub chord_buttons: [usize; 2],
    pub chord_hold_ms: u64,
    pub repeat_delay_ms: u64,
    pub repeat_interval_ms: u64,
    pub tap_after_repeat: bool,
}

/// The input engine: chord controller + per-button classifiers + the
/// active profile index.
pub struct Engine {
    switcher: ProfileSwitcher,
    classifier_params: ClassifierParams,
    classifiers: [Classifier; NUM_BUTTONS],
    active_profile: usize,
}

impl Engine {
    /// Build the engine. `profile_count` comes from the validated
    /// keymap, so the modulo-cycled profile index can never leave the
    /// table.
    pub fn new(profile_count: usize, params: EngineParams) -> Result<Self, ConfigError> {
        let switcher =
            ProfileSwitcher::new(params.chord_buttons, params.chord_hold_ms, profile_count)?;
        Ok(Self {
            switcher,
            classifier_params: ClassifierParams {
                repeat_delay_ms: params.repeat_delay_ms,
                repeat_interval_ms: params.repeat_interval_ms,
                tap_after_repeat: params.tap_after_repeat,
            },
            classifiers: Default::default(),
            active_profile: 0,
        })
    }

    /// Process one tick worth of samples.
    pub fn tick(&mut self, samples: &[ButtonSample; NUM_BUTTONS]) -> Vec<ButtonEvent, NUM_BUTTONS> {
        let mut events = Vec::new();

        if self.switcher.update(samples, &mut self.active_profile) {
            return events;
        }

        for (button, (classifier, sample)) in
            self.classifiers.iter_mut().zip(samples.iter()).enumerate()
        {
            if let Some(kind) = classifier.update(*sample, &self.classifier_params) {
                // NUM_BUTTONS events fit by capacity; push cannot fail.
                let _ = events.push(ButtonEvent { button, kind });
            }
        }

        events
    }

    /// The profile the dispatcher should map events through. Mutated
    /// only by the chord controller, always a valid table index.
    pub fn active_profile(&self) -> usize {
        self.active_profile
    }

    /// Whether a profile-switch chord is in progress or settling.
    pub fn chord_active(&self) -> bool {
        self.switcher.is_active()
    }
}
