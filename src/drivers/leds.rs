//! RGB LED and mode indicator drivers.
//!
//! Three LEDC PWM channels (CH0-2) drive a common-cathode RGB LED; CH3
//! drives the single-colour mode indicator.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC channels via hw_init.
//! On host/test: hw_init records the duty in-memory.

use crate::color::{DriveTriple, TOP_VALUE};
use crate::drivers::hw_init;

pub struct RgbLed {
    current: DriveTriple,
}

impl RgbLed {
    pub fn new() -> Self {
        Self { current: DriveTriple::OFF }
    }

    pub fn set(&mut self, drive: DriveTriple) {
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, drive.r);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, drive.g);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, drive.b);
        self.current = drive;
    }

    pub fn off(&mut self) {
        self.set(DriveTriple::OFF);
    }

    pub fn current(&self) -> DriveTriple {
        self.current
    }
}

impl Default for RgbLed {
    fn default() -> Self {
        Self::new()
    }
}

pub struct IndicatorLed {
    level: u16,
}

impl IndicatorLed {
    pub fn new() -> Self {
        Self { level: 0 }
    }

    /// Skips the register write when the level is unchanged; the main loop
    /// calls this every millisecond.
    pub fn set(&mut self, level: u16) {
        let level = level.min(TOP_VALUE);
        if level != self.level {
            hw_init::ledc_set(hw_init::LEDC_CH_INDICATOR, level);
            self.level = level;
        }
    }

    pub fn level(&self) -> u16 {
        self.level
    }
}

impl Default for IndicatorLed {
    fn default() -> Self {
        Self::new()
    }
}
