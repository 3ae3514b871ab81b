//! HSV colour model and conversion to PWM drive values.
//!
//! All arithmetic is integer and truncating, matching the 0–1000 duty
//! scale of the LED PWM peripheral.  `hsv_to_drive` followed by
//! `drive_to_hsv` is lossy: do not expect an exact inverse.
//!
//! | Sector | Hue range   | (R, G, B)  |
//! |--------|-------------|------------|
//! | 0      | 0 – 59      | (v, t, p)  |
//! | 1      | 60 – 119    | (q, v, p)  |
//! | 2      | 120 – 179   | (p, v, t)  |
//! | 3      | 180 – 239   | (p, q, v)  |
//! | 4      | 240 – 299   | (t, p, v)  |
//! | 5      | 300 – 359   | (v, p, q)  |

use serde::{Deserialize, Serialize};

/// Full-scale PWM duty value.  Every drive channel lies in `0..=TOP_VALUE`.
pub const TOP_VALUE: u16 = 1000;

/// Divisor mapping a `TOP_VALUE`-scale channel onto a 0–100 percentage.
/// Fixed at 10 for the 1000-step scale; it is not derived from `TOP_VALUE`.
const DRIVE_PER_PERCENT: u16 = 10;

pub const HUE_MAX: u16 = 360;
pub const PERCENT_MAX: u8 = 100;

/// Canonical in-memory colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HsvColor {
    /// Hue in degrees, `0..360`.
    pub hue: u16,
    /// Saturation in percent, `0..=100`.
    pub saturation: u8,
    /// Value (brightness) in percent, `0..=100`.
    pub value: u8,
}

impl HsvColor {
    /// Build a colour, wrapping hue into `0..360` and clamping the
    /// percentages to 100.
    pub const fn new(hue: u16, saturation: u8, value: u8) -> Self {
        Self {
            hue: hue % HUE_MAX,
            saturation: if saturation > PERCENT_MAX { PERCENT_MAX } else { saturation },
            value: if value > PERCENT_MAX { PERCENT_MAX } else { value },
        }
    }

    /// Convert to PWM drive values.
    pub fn to_drive(self) -> DriveTriple {
        hsv_to_drive(self.hue, self.saturation, self.value)
    }

    /// Step hue by one degree, wrapping at 360.
    pub fn step_hue(&mut self) {
        self.hue = (self.hue + 1) % HUE_MAX;
    }

    /// Step saturation by one percent, wrapping 100 → 0.
    pub fn step_saturation(&mut self) {
        self.saturation = step_percent(self.saturation);
    }

    /// Step value by one percent, wrapping 100 → 0.
    pub fn step_value(&mut self) {
        self.value = step_percent(self.value);
    }
}

fn step_percent(x: u8) -> u8 {
    ((u16::from(x) + 1) % (u16::from(PERCENT_MAX) + 1)) as u8
}

impl core::fmt::Display for HsvColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "H={} S={} V={}", self.hue, self.saturation, self.value)
    }
}

/// Per-channel PWM duty values, each `0..=TOP_VALUE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriveTriple {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl DriveTriple {
    pub const OFF: Self = Self { r: 0, g: 0, b: 0 };

    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    /// Convert back to HSV (lossy).
    pub fn to_hsv(self) -> HsvColor {
        drive_to_hsv(self.r, self.g, self.b)
    }
}

impl core::fmt::Display for DriveTriple {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "R={} G={} B={}", self.r, self.g, self.b)
    }
}

/// Convert HSV to drive values on the `TOP_VALUE` scale.
///
/// Out-of-range inputs are tolerated: hue is reduced modulo 360 and the
/// percentages are clamped to 100.
pub fn hsv_to_drive(h: u16, s: u8, v: u8) -> DriveTriple {
    let h = u32::from(h % HUE_MAX);
    let s = u32::from(s.min(PERCENT_MAX));
    let v = u32::from(v.min(PERCENT_MAX));
    let top = u32::from(TOP_VALUE);

    if s == 0 {
        let grey = (v * top / 100) as u16;
        return DriveTriple::new(grey, grey, grey);
    }

    let sector = h / 60;
    // Position within the sector on a 0..360 scale.
    let remainder = (h % 60) * 6;

    let p = v * (100 - s) / 100;
    let q = v * (100 - (s * remainder) / 360) / 100;
    let t = v * (100 - (s * (360 - remainder)) / 360) / 100;

    let v_d = (v * top / 100) as u16;
    let p_d = (p * top / 100) as u16;
    let q_d = (q * top / 100) as u16;
    let t_d = (t * top / 100) as u16;

    match sector {
        0 => DriveTriple::new(v_d, t_d, p_d),
        1 => DriveTriple::new(q_d, v_d, p_d),
        2 => DriveTriple::new(p_d, v_d, t_d),
        3 => DriveTriple::new(p_d, q_d, v_d),
        4 => DriveTriple::new(t_d, p_d, v_d),
        _ => DriveTriple::new(v_d, p_d, q_d),
    }
}

/// Convert drive values back to HSV.  Channels above `TOP_VALUE` are
/// clamped first.
pub fn drive_to_hsv(r: u16, g: u16, b: u16) -> HsvColor {
    let r = i32::from(r.min(TOP_VALUE));
    let g = i32::from(g.min(TOP_VALUE));
    let b = i32::from(b.min(TOP_VALUE));

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = (max / i32::from(DRIVE_PER_PERCENT)) as u8;
    let saturation = if max == 0 { 0 } else { (delta * 100 / max) as u8 };

    if delta == 0 {
        return HsvColor { hue: 0, saturation, value };
    }

    let hue = if max == r {
        60 * (g - b) / delta
    } else if max == g {
        60 * (b - r) / delta + 120
    } else {
        60 * (r - g) / delta + 240
    };

    HsvColor {
        hue: hue.rem_euclid(i32::from(HUE_MAX)) as u16,
        saturation,
        value,
    }
}
