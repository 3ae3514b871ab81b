//! Shared mutable context threaded through every FSM handler.
//!
//! `DeviceState` is the single struct that mode handlers read from and
//! write to: the live colour and its drive values, the button level and
//! clock sampled for this tick, the indicator pattern the mode wants, and
//! the pending-save flag raised when an edit cycle completes.

use crate::color::{DriveTriple, HsvColor};
use crate::config::SystemConfig;
use crate::drivers::led_patterns::IndicatorPattern;

pub struct DeviceState {
    /// Live configuration.
    pub config: SystemConfig,

    // --- Colour ---
    pub color: HsvColor,
    /// Always `color.to_drive()`; refreshed by [`set_color`](Self::set_color).
    pub drive: DriveTriple,

    // --- Inputs sampled each tick ---
    pub now_ms: u32,
    pub button_held: bool,
    /// Time of the last hold-to-edit step.
    pub last_value_change_ms: u32,

    // --- Outputs ---
    pub indicator: IndicatorPattern,
    /// Set when an edit cycle finishes; cleared once the colour is persisted.
    pub save_pending: bool,
}

impl DeviceState {
    pub fn new(config: SystemConfig, color: HsvColor) -> Self {
        Self {
            config,
            color,
            drive: color.to_drive(),
            now_ms: 0,
            button_held: false,
            last_value_change_ms: 0,
            indicator: IndicatorPattern::Off,
            save_pending: false,
        }
    }

    /// Replace the colour and recompute the drive values.
    pub fn set_color(&mut self, color: HsvColor) {
        self.color = color;
        self.drive = color.to_drive();
    }

    /// True once the hold-to-edit interval has elapsed since the last step.
    pub fn edit_step_due(&self) -> bool {
        self.button_held
            && self.now_ms.wrapping_sub(self.last_value_change_ms)
                >= self.config.value_change_interval_ms
    }
}
