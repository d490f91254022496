//! HID report types shared by the dispatcher and the BLE transport.

pub mod consumer;
pub mod keyboard;

/// A report headed for the BLE link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidReport {
    Keyboard(keyboard::KeyboardReport),
    Consumer(consumer::ConsumerReport),
}
