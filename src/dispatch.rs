//! Event dispatch to the HID transport.
//!
//! One classified event becomes exactly one synthetic press+release
//! click on the wire: the transport never sees hold duration; auto
//! repeat is expressed as a stream of clicks. Delivery is fire and
//! forget - the transport swallows failures, and events produced while
//! disconnected are lost, never queued.

use crate::engine::ButtonEvent;
use crate::keymap::{KeyAction, Keymap};

/// The operations the wireless HID link offers. Implemented by the BLE
/// report sender on target and by mocks in host tests.
pub trait HidTransport {
    /// Press a standard keyboard key (usage page 0x07).
    fn key_press(&mut self, code: u8);
    /// Release all standard keys.
    fn key_release(&mut self);
    /// Press a consumer control key (usage page 0x0C).
    fn consumer_press(&mut self, usage: u16);
    /// Release the consumer control key.
    fn consumer_release(&mut self);
}

/// Map an event through the active profile and click it out.
pub fn dispatch<T: HidTransport>(
    transport: &mut T,
    keymap: &Keymap,
    profile: usize,
    event: ButtonEvent,
) {
    match keymap.lookup(profile, event.button, event.kind) {
        KeyAction::Key(code) => {
            transport.key_press(code);
            transport.key_release();
        }
        KeyAction::Consumer(usage) => {
            transport.consumer_press(usage);
            transport.consumer_release();
        }
    }
}
