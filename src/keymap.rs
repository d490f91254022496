//! Profile-indexed key mapping table.
//!
//! The table maps `(profile, button, press kind)` to the HID action to
//! emit. It is built once at startup from a [`KeymapConfig`] and never
//! mutated; validation happens at construction so that lookups during
//! the tick loop are total and need no bounds or hole checks.

use crate::config::{MAX_PROFILES, NUM_BUTTONS};
use crate::error::ConfigError;
use heapless::Vec;

/// What a button press turns into on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// Standard keyboard key (usage page 0x07 code).
    Key(u8),
    /// Consumer control key (usage page 0x0C code) - media/volume.
    Consumer(u16),
}

/// How the press was classified by the input engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    /// Press-then-release shorter than the repeat delay.
    Tap,
    /// Auto-repeat fire while the button stays held.
    Repeat,
}

/// Tap and hold actions for one button in one profile.
///
/// `None` entries are configuration holes; [`Keymap::from_config`]
/// rejects them.
#[derive(Clone, Copy, Debug)]
pub struct ButtonMapping {
    pub tap: Option<KeyAction>,
    pub hold: Option<KeyAction>,
}

impl ButtonMapping {
    /// Map tap and auto-repeat to the same action.
    pub const fn same(action: KeyAction) -> Self {
        Self {
            tap: Some(action),
            hold: Some(action),
        }
    }

    /// Map tap and auto-repeat to different actions.
    pub const fn split(tap: KeyAction, hold: KeyAction) -> Self {
        Self {
            tap: Some(tap),
            hold: Some(hold),
        }
    }
}

/// One profile's mappings, as written in configuration.
#[derive(Clone, Copy, Debug)]
pub struct ProfileConfig {
    pub buttons: [ButtonMapping; NUM_BUTTONS],
}

/// The raw configuration structure the firmware is built with.
#[derive(Clone, Copy, Debug)]
pub struct KeymapConfig {
    pub profiles: &'static [ProfileConfig],
}

/// Dense validated mapping row: `[tap, hold]` per button.
type ProfileRow = [[KeyAction; 2]; NUM_BUTTONS];

/// The validated, immutable mapping table.
#[derive(Debug)]
pub struct Keymap {
    profiles: Vec<ProfileRow, MAX_PROFILES>,
}

impl Keymap {
    /// Build the table from configuration, verifying that every
    /// (profile, button) pair has both a tap and a hold entry.
    pub fn from_config(cfg: &KeymapConfig) -> Result<Self, ConfigError> {
        if cfg.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let mut profiles: Vec<ProfileRow, MAX_PROFILES> = Vec::new();

        for (p, profile) in cfg.profiles.iter().enumerate() {
            let mut row: ProfileRow = [[KeyAction::Key(0); 2]; NUM_BUTTONS];

            for (b, mapping) in profile.buttons.iter().enumerate() {
                row[b][0] = mapping.tap.ok_or(ConfigError::MissingMapping {
                    profile: p,
                    button: b,
                    kind: PressKind::Tap,
                })?;
                row[b][1] = mapping.hold.ok_or(ConfigError::MissingMapping {
                    profile: p,
                    button: b,
                    kind: PressKind::Repeat,
                })?;
            }

            profiles
                .push(row)
                .map_err(|_| ConfigError::TooManyProfiles)?;
        }

        Ok(Self { profiles })
    }

    /// Number of profiles in the table. Always at least 1.
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    /// Look up the action for an event. Infallible: `profile` comes from
    /// the engine's modulo-cycled index and holes were rejected at
    /// construction.
    pub fn lookup(&self, profile: usize, button: usize, kind: PressKind) -> KeyAction {
        let slot = match kind {
            PressKind::Tap => 0,
            PressKind::Repeat => 1,
        };
        self.profiles[profile][button][slot]
    }
}
