//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and the key mapping
//! tables live here so they can be tuned in one place. Nothing in this
//! module is mutable at runtime.

use crate::hid::consumer::ConsumerUsage;
use crate::hid::keyboard::KeyboardUsage;
use crate::keymap::{ButtonMapping, KeyAction, KeymapConfig, ProfileConfig};

// Buttons

/// Number of physical buttons.
pub const NUM_BUTTONS: usize = 4;

/// Indices of the two buttons that form the profile-switch chord.
pub const CHORD_BUTTONS: [usize; 2] = [0, 3];

/// How long both chord buttons must be held before the active profile
/// advances (ms).
pub const CHORD_HOLD_MS: u64 = 5000;

/// Hold time before the first auto-repeat fires (ms).
pub const REPEAT_DELAY_MS: u64 = 1000;

/// Cadence of auto-repeat fires after the first one (ms).
pub const REPEAT_INTERVAL_MS: u64 = 500;

/// Whether releasing a button still fires its tap action after
/// auto-repeat has already fired for the same hold.
pub const TAP_AFTER_REPEAT: bool = true;

/// Raw level must hold this long before the clean level flips (ms).
pub const DEBOUNCE_MS: u64 = 5;

/// Input poll period (ms). One engine tick per poll.
pub const TICK_MS: u64 = 5;

// GPIO pin assignments (nRF52840 feather-style board)
//
// These are logical names; actual `embassy_nrf::peripherals::*` pins are
// selected in `main.rs`.  All buttons are active-low with internal pull-up.
//
//   Button 0 → P0.31
//   Button 1 → P0.29
//   Button 2 → P0.02
//   Button 3 → P1.15

// Key mapping

/// Maximum number of profiles the firmware supports. The actual count is
/// whatever `KEYMAP` defines (2 in this build).
pub const MAX_PROFILES: usize = 4;

/// Default keymap: profile 0 types keyboard keys, profile 1 sends media
/// controls. Tap and hold share an action per button; the table supports
/// splitting them if a deployment wants different hold behaviour.
pub const KEYMAP: KeymapConfig = KeymapConfig {
    profiles: &[
        ProfileConfig {
            buttons: [
                ButtonMapping::same(KeyAction::Key(KeyboardUsage::Equal as u8)),
                ButtonMapping::same(KeyAction::Key(KeyboardUsage::Minus as u8)),
                ButtonMapping::same(KeyAction::Key(KeyboardUsage::R as u8)),
                ButtonMapping::same(KeyAction::Key(KeyboardUsage::C as u8)),
            ],
        },
        ProfileConfig {
            buttons: [
                ButtonMapping::same(KeyAction::Consumer(ConsumerUsage::NextTrack as u16)),
                ButtonMapping::same(KeyAction::Consumer(ConsumerUsage::PrevTrack as u16)),
                ButtonMapping::same(KeyAction::Consumer(ConsumerUsage::VolumeDown as u16)),
                ButtonMapping::same(KeyAction::Consumer(ConsumerUsage::VolumeUp as u16)),
            ],
        },
    ],
};

// BLE

/// GAP device name, also advertised as the complete local name.
pub const BLE_DEVICE_NAME: &str = "macropad";

/// Device Information Service strings.
pub const BLE_MANUFACTURER: &str = "macropad";
pub const BLE_MODEL_NUMBER: &str = "macropad-4k";
pub const BLE_SERIAL_NUMBER: &str = "000001";

/// PnP ID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const BLE_VID: u16 = 0x1209;
pub const BLE_PID: u16 = 0x0002;

/// Advertising interval (in 0.625 ms units). 244 = 152.5 ms.
pub const BLE_ADV_INTERVAL: u32 = 244;

/// Depth of the report channel between the tick loop and the BLE task.
/// Reports beyond this while the link is busy are dropped, not queued.
pub const REPORT_CHANNEL_DEPTH: usize = 8;
