//! Button input subsystem.
//!
//! Split in two layers:
//!
//! - **`debounce`**: a pure per-button filter turning raw pin levels
//!   into clean samples (level, changed flag, time in level). Host
//!   testable, no hardware types.
//! - **`buttons`**: the GPIO layer that reads the four active-low pins
//!   once per tick and feeds the filters.

pub mod debounce;

#[cfg(feature = "embedded")]
pub mod buttons;
