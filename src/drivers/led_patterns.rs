//! Indicator LED pattern engine.
//!
//! Generates the single-channel indicator intensity.  The main loop calls
//! `tick()` every iteration and feeds the result to
//! [`IndicatorPort::set_indicator`](crate::app::ports::IndicatorPort::set_indicator).
//!
//! ## Priority
//!
//! 1. **Identity**: device-id digit sequence, played once at boot
//! 2. **Mode**: pattern selected by the current input mode
//!
//! ## Mode patterns
//!
//! | Pattern   | Mode        | Output                                 |
//! |-----------|-------------|----------------------------------------|
//! | Off       | NoInput     | 0                                      |
//! | SlowBlink | Hue         | on `blink_slow_ms`, off `blink_slow_ms`|
//! | FastBlink | Saturation  | on `blink_fast_ms`, off `blink_fast_ms`|
//! | Solid     | Brightness  | constant                               |
//!
//! ## Identity sequence
//!
//! For each decimal digit of the device id: `digit` blinks of 150 ms on /
//! 150 ms off, then a 1000 ms dark gap.  A zero digit is just the gap.

use heapless::Vec;

const IDENTITY_BLINK_MS: u32 = 150;
const IDENTITY_GAP_MS: u32 = 1000;

/// Enough for every digit of a `u32`.
const MAX_DIGITS: usize = 10;

/// Pattern identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorPattern {
    #[default]
    Off,
    SlowBlink,
    FastBlink,
    Solid,
}

/// Indicator pattern engine. Stack-allocated, no heap.
pub struct IndicatorEngine {
    level: u16,
    blink_slow_ms: u32,
    blink_fast_ms: u32,
    pattern: IndicatorPattern,
    phase_ms: u32,
    identity: Option<IdentitySequence>,
}

struct IdentitySequence {
    digits: Vec<u8, MAX_DIGITS>,
    elapsed_ms: u32,
}

impl IndicatorEngine {
    pub fn new(level: u16, blink_slow_ms: u32, blink_fast_ms: u32) -> Self {
        Self {
            level,
            blink_slow_ms,
            blink_fast_ms,
            pattern: IndicatorPattern::Off,
            phase_ms: 0,
            identity: None,
        }
    }

    /// Select the mode pattern.  Changing pattern restarts its phase so a
    /// blink always begins lit.
    pub fn set_pattern(&mut self, pattern: IndicatorPattern) {
        if pattern != self.pattern {
            self.pattern = pattern;
            self.phase_ms = 0;
        }
    }

    pub fn pattern(&self) -> IndicatorPattern {
        self.pattern
    }

    /// Start the identity sequence for `device_id`; it overrides the mode
    /// pattern until it completes.
    pub fn play_identity(&mut self, device_id: u32) {
        self.identity = Some(IdentitySequence {
            digits: decimal_digits(device_id),
            elapsed_ms: 0,
        });
    }

    pub fn identity_active(&self) -> bool {
        self.identity.is_some()
    }

    /// Advance by `delta_ms` and return the indicator intensity.
    pub fn tick(&mut self, delta_ms: u32) -> u16 {
        if let Some(seq) = &mut self.identity {
            let lit = identity_lit(&seq.digits, seq.elapsed_ms);
            seq.elapsed_ms = seq.elapsed_ms.saturating_add(delta_ms);
            match lit {
                Some(true) => return self.level,
                Some(false) => return 0,
                None => self.identity = None,
            }
        }

        let out = self.generate();
        self.phase_ms = self.phase_ms.wrapping_add(delta_ms);
        out
    }

    fn generate(&self) -> u16 {
        match self.pattern {
            IndicatorPattern::Off => 0,
            IndicatorPattern::Solid => self.level,
            IndicatorPattern::SlowBlink => self.square(self.blink_slow_ms),
            IndicatorPattern::FastBlink => self.square(self.blink_fast_ms),
        }
    }

    fn square(&self, half_period_ms: u32) -> u16 {
        let half = half_period_ms.max(1);
        if (self.phase_ms / half) % 2 == 0 { self.level } else { 0 }
    }
}

/// Most significant digit first; `0` yields `[0]`.
fn decimal_digits(mut n: u32) -> Vec<u8, MAX_DIGITS> {
    let mut digits: Vec<u8, MAX_DIGITS> = Vec::new();
    loop {
        // At most ten digits fit in a u32, so the push cannot fail.
        let _ = digits.push((n % 10) as u8);
        n /= 10;
        if n == 0 {
            break;
        }
    }
    digits.reverse();
    digits
}

/// `Some(lit)` at `t` ms into the sequence, `None` once it has finished.
fn identity_lit(digits: &[u8], mut t: u32) -> Option<bool> {
    for &d in digits {
        let blinks_ms = u32::from(d) * 2 * IDENTITY_BLINK_MS;
        if t < blinks_ms {
            return Some((t / IDENTITY_BLINK_MS) % 2 == 0);
        }
        t -= blinks_ms;
        if t < IDENTITY_GAP_MS {
            return Some(false);
        }
        t -= IDENTITY_GAP_MS;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> IndicatorEngine {
        IndicatorEngine::new(1000, 1000, 200)
    }

    #[test]
    fn off_and_solid() {
        let mut e = engine();
        assert_eq!(e.tick(1), 0);
        e.set_pattern(IndicatorPattern::Solid);
        assert_eq!(e.tick(1), 1000);
        assert_eq!(e.tick(5000), 1000);
    }

    #[test]
    fn slow_blink_starts_lit_and_toggles_each_period() {
        let mut e = engine();
        e.set_pattern(IndicatorPattern::SlowBlink);
        assert_eq!(e.tick(999), 1000); // phase 0
        assert_eq!(e.tick(1), 1000); // phase 999
        assert_eq!(e.tick(1), 0); // phase 1000
        assert_eq!(e.tick(999), 0); // phase 1001
        assert_eq!(e.tick(1), 1000); // phase 2000
    }

    #[test]
    fn fast_blink_period() {
        let mut e = engine();
        e.set_pattern(IndicatorPattern::FastBlink);
        let samples: std::vec::Vec<u16> = (0..4).map(|_| e.tick(200)).collect();
        assert_eq!(samples, vec![1000, 0, 1000, 0]);
    }

    #[test]
    fn pattern_change_resets_phase() {
        let mut e = engine();
        e.set_pattern(IndicatorPattern::FastBlink);
        e.tick(300);
        e.set_pattern(IndicatorPattern::SlowBlink);
        assert_eq!(e.tick(1), 1000);
    }

    #[test]
    fn same_pattern_keeps_phase() {
        let mut e = engine();
        e.set_pattern(IndicatorPattern::FastBlink);
        e.tick(250);
        e.set_pattern(IndicatorPattern::FastBlink);
        assert_eq!(e.tick(1), 0);
    }

    #[test]
    fn digits_of_device_id() {
        assert_eq!(decimal_digits(7205).as_slice(), &[7, 2, 0, 5]);
        assert_eq!(decimal_digits(0).as_slice(), &[0]);
        assert_eq!(decimal_digits(u32::MAX).len(), 10);
    }

    #[test]
    fn identity_sequence_timing() {
        let digits = [2, 0, 1];
        assert_eq!(identity_lit(&digits, 0), Some(true));
        assert_eq!(identity_lit(&digits, 150), Some(false));
        assert_eq!(identity_lit(&digits, 300), Some(true));
        assert_eq!(identity_lit(&digits, 599), Some(false));
        // Gap after the first digit, then the zero digit's gap.
        assert_eq!(identity_lit(&digits, 600), Some(false));
        assert_eq!(identity_lit(&digits, 2599), Some(false));
        assert_eq!(identity_lit(&digits, 2600), Some(true));
        // 1 blink + gap ends at 2600 + 300 + 1000.
        assert_eq!(identity_lit(&digits, 3899), Some(false));
        assert_eq!(identity_lit(&digits, 3900), None);
    }

    #[test]
    fn identity_overrides_mode_then_hands_back() {
        let mut e = engine();
        e.set_pattern(IndicatorPattern::Solid);
        e.play_identity(1);
        assert_eq!(e.tick(150), 1000);
        assert_eq!(e.tick(150), 0); // t = 150
        assert!(e.identity_active());
        // Remaining: off 150..300, gap 300..1300.
        for _ in 0..11 {
            e.tick(100);
        }
        assert_eq!(e.tick(1), 1000);
        assert!(!e.identity_active());
    }
}
