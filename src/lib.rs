//! Test-only library interface for macropad.
//!
//! This module exposes the pure logic modules that can be tested on the
//! host (no embedded hardware required): the debounce filter, the input
//! engine, the keymap, and the dispatcher.
//!
//! Usage: `cargo test --lib`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].
//! This lib.rs provides a separate entry point for host-based testing;
//! the BLE transport and GPIO layers only build with the `embedded`
//! feature.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod hid;
pub mod input;
pub mod keymap;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::config::{self, NUM_BUTTONS};
    use crate::dispatch::{dispatch, HidTransport};
    use crate::engine::{ButtonEvent, Engine, EngineParams};
    use crate::hid::consumer::ConsumerUsage;
    use crate::hid::keyboard::KeyboardUsage;
    use crate::input::debounce::ButtonSample;
    use crate::keymap::{Keymap, PressKind};

    const PARAMS: EngineParams = EngineParams {
        chord_buttons: [0, 3],
        chord_hold_ms: 5000,
        repeat_delay_ms: 1000,
        repeat_interval_ms: 500,
        tap_after_repeat: true,
    };

    /// Tick duration used by the harness (matches the firmware).
    const TICK: u64 = 5;

    /// Drives an `Engine` with synthetic debounced samples. Press and
    /// release calls take effect on the next tick, with `held_ms`
    /// resetting on change ticks exactly like the debounce filter.
    struct Bench {
        engine: Engine,
        now: u64,
        level: [bool; NUM_BUTTONS],
        since: [u64; NUM_BUTTONS],
        pending: [Option<bool>; NUM_BUTTONS],
    }

    impl Bench {
        fn new(profile_count: usize, params: EngineParams) -> Self {
            Self {
                engine: Engine::new(profile_count, params).unwrap(),
                now: 0,
                level: [false; NUM_BUTTONS],
                since: [0; NUM_BUTTONS],
                pending: [None; NUM_BUTTONS],
            }
        }

        fn press(&mut self, button: usize) {
            self.pending[button] = Some(true);
        }

        fn release(&mut self, button: usize) {
            self.pending[button] = Some(false);
        }

        fn tick(&mut self) -> Vec<ButtonEvent> {
            self.now += TICK;
            let mut samples = [ButtonSample {
                pressed: false,
                changed: false,
                held_ms: 0,
            }; NUM_BUTTONS];

            for b in 0..NUM_BUTTONS {
                let mut changed = false;
                if let Some(level) = self.pending[b].take() {
                    if level != self.level[b] {
                        self.level[b] = level;
                        self.since[b] = self.now;
                        changed = true;
                    }
                }
                samples[b] = ButtonSample {
                    pressed: self.level[b],
                    changed,
                    held_ms: self.now - self.since[b],
                };
            }

            self.engine.tick(&samples).into_iter().collect()
        }

        /// Run `ms` worth of quiet ticks, collecting any events.
        fn run(&mut self, ms: u64) -> Vec<ButtonEvent> {
            let mut events = Vec::new();
            for _ in 0..(ms / TICK) {
                events.extend(self.tick());
            }
            events
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        KeyPress(u8),
        KeyRelease,
        ConsumerPress(u16),
        ConsumerRelease,
    }

    #[derive(Default)]
    struct MockTransport {
        calls: Vec<Call>,
    }

    impl HidTransport for MockTransport {
        fn key_press(&mut self, code: u8) {
            self.calls.push(Call::KeyPress(code));
        }
        fn key_release(&mut self) {
            self.calls.push(Call::KeyRelease);
        }
        fn consumer_press(&mut self, usage: u16) {
            self.calls.push(Call::ConsumerPress(usage));
        }
        fn consumer_release(&mut self) {
            self.calls.push(Call::ConsumerRelease);
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Engine: taps
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn short_press_yields_one_tap_no_repeats() {
        let mut bench = Bench::new(2, PARAMS);

        bench.press(1);
        let mut events = bench.run(200);
        bench.release(1);
        events.extend(bench.run(100));

        assert_eq!(
            events,
            vec![ButtonEvent {
                button: 1,
                kind: PressKind::Tap,
            }]
        );
    }

    #[test]
    fn chord_button_taps_normally_while_no_chord() {
        let mut bench = Bench::new(2, PARAMS);

        bench.press(0);
        let mut events = bench.run(100);
        bench.release(0);
        events.extend(bench.run(50));

        assert_eq!(
            events,
            vec![ButtonEvent {
                button: 0,
                kind: PressKind::Tap,
            }]
        );
    }

    // ════════════════════════════════════════════════════════════════════════
    // Engine: auto-repeat
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn hold_fires_initial_repeat_then_cadence() {
        let mut bench = Bench::new(2, PARAMS);

        bench.press(2);
        // Initial wait + 3 repeat intervals: one initial fire plus two
        // subsequent ones land inside this window.
        let events = bench.run(1000 + 3 * 500);

        let repeats: Vec<_> = events
            .iter()
            .filter(|e| e.kind == PressKind::Repeat)
            .collect();
        assert_eq!(repeats.len(), 3);
        assert!(events.iter().all(|e| e.button == 2));
        assert!(events.iter().all(|e| e.kind != PressKind::Tap));
    }

    #[test]
    fn release_after_repeats_follows_policy() {
        // Default policy: the release tap still fires (original
        // firmware behaviour).
        let mut bench = Bench::new(2, PARAMS);
        bench.press(2);
        bench.run(1600);
        bench.release(2);
        let events = bench.run(50);
        assert_eq!(
            events,
            vec![ButtonEvent {
                button: 2,
                kind: PressKind::Tap,
            }]
        );

        // Suppressing variant: nothing on release.
        let params = EngineParams {
            tap_after_repeat: false,
            ..PARAMS
        };
        let mut bench = Bench::new(2, params);
        bench.press(2);
        bench.run(1600);
        bench.release(2);
        assert!(bench.run(50).is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Engine: profile chord
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn chord_hold_advances_profile_exactly_once() {
        let mut bench = Bench::new(2, PARAMS);

        bench.press(0);
        bench.press(3);
        let events = bench.run(5100);
        assert!(events.is_empty());
        assert_eq!(bench.engine.active_profile(), 1);

        // Keep holding for three times the threshold: no further advance.
        let events = bench.run(2 * 5000);
        assert!(events.is_empty());
        assert_eq!(bench.engine.active_profile(), 1);

        bench.release(0);
        bench.release(3);
        let events = bench.run(100);
        assert!(events.is_empty());
        assert_eq!(bench.engine.active_profile(), 1);
    }

    #[test]
    fn chord_released_early_changes_nothing() {
        let mut bench = Bench::new(2, PARAMS);

        bench.press(0);
        bench.press(3);
        let mut events = bench.run(1000);
        bench.release(0);
        bench.release(3);
        events.extend(bench.run(200));

        assert!(events.is_empty());
        assert_eq!(bench.engine.active_profile(), 0);
    }

    #[test]
    fn chord_abort_with_staggered_release_stays_silent() {
        let mut bench = Bench::new(2, PARAMS);

        bench.press(0);
        bench.press(3);
        let mut events = bench.run(500);
        bench.release(0);
        events.extend(bench.run(300));
        // Button 3 is still down, alone, its press edge never observed:
        // it must not tap on release nor start repeating.
        events.extend(bench.run(2000));
        bench.release(3);
        events.extend(bench.run(100));

        assert!(events.is_empty());
        assert_eq!(bench.engine.active_profile(), 0);
    }

    #[test]
    fn chord_cycle_returns_to_original_profile() {
        let mut bench = Bench::new(3, PARAMS);
        assert_eq!(bench.engine.active_profile(), 0);

        for expected in [1, 2, 0] {
            bench.press(0);
            bench.press(3);
            bench.run(5100);
            bench.release(0);
            bench.release(3);
            bench.run(100);
            assert_eq!(bench.engine.active_profile(), expected);
        }
    }

    #[test]
    fn press_during_settling_is_ignored_until_clean_release() {
        let mut bench = Bench::new(2, PARAMS);

        bench.press(0);
        bench.press(3);
        bench.run(5100);
        // Profile advanced; chord buttons still down. Press button 1
        // while the controller is settling.
        bench.press(1);
        let mut events = bench.run(100);
        bench.release(0);
        bench.release(3);
        events.extend(bench.run(100));
        // Controller is idle again but button 1's press was never
        // observed: releasing it fires nothing.
        bench.release(1);
        events.extend(bench.run(100));
        assert!(events.is_empty());

        // A fresh tap works normally afterwards.
        bench.press(1);
        bench.run(100);
        bench.release(1);
        let events = bench.run(50);
        assert_eq!(
            events,
            vec![ButtonEvent {
                button: 1,
                kind: PressKind::Tap,
            }]
        );
    }

    // ════════════════════════════════════════════════════════════════════════
    // Dispatcher
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn dispatch_keyboard_action_clicks_press_then_release() {
        let keymap = Keymap::from_config(&config::KEYMAP).unwrap();
        let mut transport = MockTransport::default();

        dispatch(
            &mut transport,
            &keymap,
            0,
            ButtonEvent {
                button: 1,
                kind: PressKind::Tap,
            },
        );

        assert_eq!(
            transport.calls,
            vec![
                Call::KeyPress(KeyboardUsage::Minus as u8),
                Call::KeyRelease,
            ]
        );
    }

    #[test]
    fn dispatch_consumer_action_clicks_press_then_release() {
        let keymap = Keymap::from_config(&config::KEYMAP).unwrap();
        let mut transport = MockTransport::default();

        dispatch(
            &mut transport,
            &keymap,
            1,
            ButtonEvent {
                button: 3,
                kind: PressKind::Repeat,
            },
        );

        assert_eq!(
            transport.calls,
            vec![
                Call::ConsumerPress(ConsumerUsage::VolumeUp as u16),
                Call::ConsumerRelease,
            ]
        );
    }

    #[test]
    fn repeat_stream_dispatches_one_click_each() {
        let keymap = Keymap::from_config(&config::KEYMAP).unwrap();
        let mut transport = MockTransport::default();
        let mut bench = Bench::new(keymap.profile_count(), PARAMS);

        bench.press(2);
        let events = bench.run(2100);
        for event in &events {
            dispatch(&mut transport, &keymap, bench.engine.active_profile(), *event);
        }

        // 3 repeats, each a press+release pair of profile 0's mapping.
        assert_eq!(transport.calls.len(), 6);
        assert!(transport
            .calls
            .iter()
            .step_by(2)
            .all(|c| *c == Call::KeyPress(KeyboardUsage::R as u8)));
    }
}
