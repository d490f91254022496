//! Chord-based profile switching.
//!
//! Holding the two chord buttons together past the hold threshold
//! advances the active profile by one (modulo the profile count). The
//! advance is edge-triggered: it fires exactly once per physical chord
//! hold, however long the buttons stay down afterwards.
//!
//! Whenever the controller is not idle - including the ticks where it
//! enters or leaves a state - normal button processing is suppressed for
//! the whole device. The suppression through `Settling` is what requires
//! a clean release of the chord buttons before ordinary input resumes,
//! so lifting fingers off the chord never echoes their mapped keys.

use crate::config::NUM_BUTTONS;
use crate::error::ConfigError;
use crate::input::debounce::ButtonSample;

/// Chord gesture state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum ChordState {
    /// No chord in progress.
    Idle,
    /// Both chord buttons down, threshold not yet reached.
    Holding,
    /// Profile advanced; waiting for both buttons to be released.
    Settling,
}

/// The profile controller.
#[derive(Debug)]
pub struct ProfileSwitcher {
    chord: [usize; 2],
    hold_ms: u64,
    profile_count: usize,
    state: ChordState,
}

impl ProfileSwitcher {
    pub fn new(
        chord: [usize; 2],
        hold_ms: u64,
        profile_count: usize,
    ) -> Result<Self, ConfigError> {
        if profile_count == 0 {
            return Err(ConfigError::NoProfiles);
        }
        if chord[0] == chord[1] {
            return Err(ConfigError::ChordButtonsIdentical);
        }
        for idx in chord {
            if idx >= NUM_BUTTONS {
                return Err(ConfigError::ChordButtonOutOfRange(idx));
            }
        }
        Ok(Self {
            chord,
            hold_ms,
            profile_count,
            state: ChordState::Idle,
        })
    }

    /// Evaluate the chord for this tick, possibly advancing
    /// `active_profile`. Returns `true` when normal button processing
    /// must be skipped for the rest of the tick.
    pub fn update(
        &mut self,
        samples: &[ButtonSample; NUM_BUTTONS],
        active_profile: &mut usize,
    ) -> bool {
        let a = samples[self.chord[0]];
        let b = samples[self.chord[1]];
        let both_pressed = a.pressed && b.pressed;

        match self.state {
            ChordState::Idle => {
                if both_pressed {
                    self.state = ChordState::Holding;
                    true
                } else {
                    false
                }
            }
            ChordState::Holding => {
                if !both_pressed {
                    // Aborted before the threshold. The abort tick is
                    // still suppressed so the release cannot tap.
                    self.state = ChordState::Idle;
                } else if a.held_ms > self.hold_ms && b.held_ms > self.hold_ms {
                    *active_profile = (*active_profile + 1) % self.profile_count;
                    self.state = ChordState::Settling;
                }
                true
            }
            ChordState::Settling => {
                if !a.pressed && !b.pressed {
                    self.state = ChordState::Idle;
                }
                true
            }
        }
    }

    /// Whether a chord gesture is in progress or settling.
    pub fn is_active(&self) -> bool {
        self.state != ChordState::Idle
    }
}
