//! Consumer Control HID support - media keys, volume, etc.
//!
//! Consumer Control is a separate HID usage page (0x0C) that handles
//! volume, playback and similar media controls. It is transmitted as a
//! separate input report alongside the keyboard report.

/// Consumer control report size (2 bytes for usage ID).
pub const CONSUMER_REPORT_SIZE: usize = 2;

/// Consumer control usage codes (Usage Page 0x0C) this firmware maps
/// buttons to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum ConsumerUsage {
    /// No action.
    None = 0x0000,
    /// Play/Pause toggle.
    PlayPause = 0x00CD,
    /// Next track.
    NextTrack = 0x00B5,
    /// Previous track.
    PrevTrack = 0x00B6,
    /// Volume up.
    VolumeUp = 0x00E9,
    /// Volume down.
    VolumeDown = 0x00EA,
    /// Mute toggle.
    Mute = 0x00E2,
}

/// Consumer Control HID report.
///
/// Simple 2-byte report containing a single usage code. Multiple
/// simultaneous keys are not supported - this device is single-key-per-
/// button by design.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    /// Active consumer control usage (little-endian u16).
    pub usage: u16,
}

impl ConsumerReport {
    /// Create an empty (no keys pressed) report.
    pub const fn empty() -> Self {
        Self { usage: 0 }
    }

    /// Create a report with a single usage code.
    pub const fn new(usage: u16) -> Self {
        Self { usage }
    }

    /// Serialize to HID report bytes.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < CONSUMER_REPORT_SIZE {
            return 0;
        }
        let bytes = self.usage.to_le_bytes();
        buf[0] = bytes[0];
        buf[1] = bytes[1];
        CONSUMER_REPORT_SIZE
    }

    /// Check if any key is pressed.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.usage == 0
    }
}

/// Report map entry for the consumer control input report.
///
/// Minimal descriptor for a single 16-bit usage.
pub const CONSUMER_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x0C, // Usage Page (Consumer)
    0x09, 0x01, // Usage (Consumer Control)
    0xA1, 0x01, // Collection (Application)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x03, //   Logical Maximum (1023)
    0x19, 0x00, //   Usage Minimum (0)
    0x2A, 0xFF, 0x03, //   Usage Maximum (1023)
    0x75, 0x10, //   Report Size (16)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x00, //   Input (Data, Array, Absolute)
    0xC0, // End Collection
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumer_report_empty() {
        let report = ConsumerReport::empty();
        assert!(report.is_empty());
        assert_eq!(report.usage, 0);
    }

    #[test]
    fn consumer_report_volume_up() {
        let report = ConsumerReport::new(ConsumerUsage::VolumeUp as u16);
        assert!(!report.is_empty());
        assert_eq!(report.usage, 0x00E9);
    }

    #[test]
    fn consumer_report_serialize() {
        let report = ConsumerReport::new(ConsumerUsage::PlayPause as u16);
        let mut buf = [0u8; 2];
        let len = report.serialize(&mut buf);
        assert_eq!(len, 2);
        assert_eq!(buf, [0xCD, 0x00]); // Little-endian 0x00CD
    }

    #[test]
    fn consumer_report_serialize_buffer_too_small() {
        let report = ConsumerReport::new(ConsumerUsage::Mute as u16);
        let mut buf = [0u8; 1];
        assert_eq!(report.serialize(&mut buf), 0);
    }
}
