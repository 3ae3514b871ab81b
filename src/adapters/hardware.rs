//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the RGB LED, the mode indicator and the button, exposing them
//! through [`IndicatorPort`] and [`ButtonPort`].  On non-espidf targets
//! the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ButtonPort, IndicatorPort};
use crate::color::DriveTriple;
use crate::drivers::button::ActiveLowButton;
use crate::drivers::hw_init::GpioInput;
use crate::drivers::leds::{IndicatorLed, RgbLed};
use crate::pins;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    rgb: RgbLed,
    indicator: IndicatorLed,
    button: ActiveLowButton<GpioInput>,
}

impl HardwareAdapter {
    pub fn new(rgb: RgbLed, indicator: IndicatorLed, button: ActiveLowButton<GpioInput>) -> Self {
        Self {
            rgb,
            indicator,
            button,
        }
    }

    /// Adapter wired to the board's pin map.
    pub fn from_pins() -> Self {
        Self::new(
            RgbLed::new(),
            IndicatorLed::new(),
            ActiveLowButton::new(GpioInput::new(pins::BUTTON_GPIO)),
        )
    }

    pub fn rgb(&self) -> DriveTriple {
        self.rgb.current()
    }

    pub fn indicator_level(&self) -> u16 {
        self.indicator.level()
    }

    /// Dark LEDs.  Run at boot so a warm reset never shows stale PWM duty.
    pub fn all_off(&mut self) {
        self.rgb.off();
        self.indicator.set(0);
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl IndicatorPort for HardwareAdapter {
    fn set_rgb(&mut self, drive: DriveTriple) {
        self.rgb.set(drive);
    }

    fn set_indicator(&mut self, intensity: u16) {
        self.indicator.set(intensity);
    }
}

// ── ButtonPort implementation ─────────────────────────────────

impl ButtonPort for HardwareAdapter {
    fn is_pressed(&mut self) -> bool {
        self.button.is_pressed()
    }
}
