//! Per-button debounce filter.
//!
//! A raw mechanical switch bounces for a few milliseconds around each
//! edge. The filter only lets the clean level flip once the raw level
//! has held steady for the debounce interval, and tracks how long the
//! clean level has been in place.
//!
//! Time is passed in by the caller (milliseconds since boot) so the
//! filter stays pure and host-testable.

/// One clean sample of a button, produced once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSample {
    /// Clean (debounced) level: `true` = pressed.
    pub pressed: bool,
    /// Whether the clean level flipped on this tick.
    pub changed: bool,
    /// Time the clean level has been in place (ms). Reads 0 exactly on
    /// the tick where `changed` is true.
    pub held_ms: u64,
}

/// Debounce state for a single button.
pub struct Debouncer {
    debounce_ms: u64,
    raw: bool,
    raw_since_ms: u64,
    clean: bool,
    clean_since_ms: u64,
}

impl Debouncer {
    /// Create a filter for a button that starts released.
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            raw: false,
            raw_since_ms: 0,
            clean: false,
            clean_since_ms: 0,
        }
    }

    /// Feed one raw reading and get the clean sample for this tick.
    pub fn update(&mut self, now_ms: u64, raw_pressed: bool) -> ButtonSample {
        if raw_pressed != self.raw {
            self.raw = raw_pressed;
            self.raw_since_ms = now_ms;
        }

        let mut changed = false;
        if self.raw != self.clean && now_ms - self.raw_since_ms >= self.debounce_ms {
            self.clean = self.raw;
            self.clean_since_ms = now_ms;
            changed = true;
        }

        ButtonSample {
            pressed: self.clean,
            changed,
            held_ms: now_ms - self.clean_since_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_glitch_is_filtered() {
        let mut d = Debouncer::new(5);
        // 2 ms spike, back to released before the interval elapses.
        assert!(!d.update(10, true).pressed);
        assert!(!d.update(12, false).pressed);
        let s = d.update(20, false);
        assert!(!s.pressed);
        assert!(!s.changed);
    }

    #[test]
    fn stable_press_flips_after_interval() {
        let mut d = Debouncer::new(5);
        assert!(!d.update(10, true).changed);
        let s = d.update(15, true);
        assert!(s.pressed);
        assert!(s.changed);
        assert_eq!(s.held_ms, 0);

        let s = d.update(40, true);
        assert!(s.pressed);
        assert!(!s.changed);
        assert_eq!(s.held_ms, 25);
    }

    #[test]
    fn release_resets_duration() {
        let mut d = Debouncer::new(5);
        d.update(0, true);
        d.update(5, true);
        d.update(100, true);
        d.update(100, false);
        let s = d.update(105, false);
        assert!(!s.pressed);
        assert!(s.changed);
        assert_eq!(s.held_ms, 0);
    }
}
