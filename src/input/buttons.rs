//! GPIO button sampling.
//!
//! Four tactile switches, active-low with internal pull-up. The pins
//! are read once at the start of every tick; the raw levels go through
//! the per-button debounce filters to become clean [`ButtonSample`]s.
//!
//! Generic over `embedded_hal::digital::InputPin` so the sampler itself
//! never names a HAL type.

use embedded_hal::digital::InputPin;

use crate::config::{DEBOUNCE_MS, NUM_BUTTONS};
use crate::input::debounce::{ButtonSample, Debouncer};

/// The four buttons plus their debounce state.
pub struct ButtonInputs<P: InputPin> {
    pins: [P; NUM_BUTTONS],
    debouncers: [Debouncer; NUM_BUTTONS],
}

impl<P: InputPin> ButtonInputs<P> {
    pub fn new(pins: [P; NUM_BUTTONS]) -> Self {
        Self {
            pins,
            debouncers: core::array::from_fn(|_| Debouncer::new(DEBOUNCE_MS)),
        }
    }

    /// Sample all buttons for this tick. Active-low: a low pin reads
    /// as pressed.
    pub fn sample(&mut self, now_ms: u64) -> [ButtonSample; NUM_BUTTONS] {
        let mut samples = [ButtonSample {
            pressed: false,
            changed: false,
            held_ms: 0,
        }; NUM_BUTTONS];

        for (i, pin) in self.pins.iter_mut().enumerate() {
            let raw_pressed = pin.is_low().unwrap_or(false);
            samples[i] = self.debouncers[i].update(now_ms, raw_pressed);
        }

        samples
    }
}
