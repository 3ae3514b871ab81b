//! GPIO / peripheral pin assignments for the indicator board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// RGB LED (common-cathode, one LEDC channel per colour)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 3;
pub const LED_G_GPIO: i32 = 4;
pub const LED_B_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Mode indicator LED
// ---------------------------------------------------------------------------

/// Single-colour LED showing the input mode (and the boot identity blink).
pub const INDICATOR_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  10-bit covers the 0 – 1000 drive scale.
pub const PWM_RESOLUTION_BITS: u32 = 10;
/// LEDC frequency for all LED channels (1 kHz, flicker-free).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// User button (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button: double click cycles the input mode, hold edits.
pub const BUTTON_GPIO: i32 = 9;
