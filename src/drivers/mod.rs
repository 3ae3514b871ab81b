//! Hardware drivers.

pub mod button;
pub mod hw_init;
pub mod led_patterns;
pub mod leds;
