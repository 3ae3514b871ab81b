//! Monotonic millisecond clock and foreground loop pacing.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.
//!
//! Timestamps are `u32` milliseconds and wrap after ~49.7 days; every
//! consumer compares them with `wrapping_sub`.

/// Time source shared by the ISR path and the foreground loop.
pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot, truncated to 32 bits.
    pub fn uptime_ms(&self) -> u32 {
        (self.uptime_us() / 1000) as u32
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        now_us()
    }

    /// Microseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Boot-relative milliseconds without a clock instance (ISR context).
#[cfg(target_os = "espidf")]
pub fn isr_now_ms() -> u32 {
    (now_us() / 1000) as u32
}

#[cfg(target_os = "espidf")]
fn now_us() -> u64 {
    // SAFETY: esp_timer_get_time is ISR-safe and has no preconditions.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
}

/// Block the foreground task until the next loop cycle.
///
/// On ESP-IDF this is a FreeRTOS delay rounded up to whole ticks, never
/// less than one, so the idle task runs and feeds the task watchdog even
/// when `period_ms` is shorter than a tick.
#[cfg(target_os = "espidf")]
pub fn idle(period_ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(period_ms.max(1));
}

/// Block the foreground task until the next loop cycle.
#[cfg(not(target_os = "espidf"))]
pub fn idle(period_ms: u32) {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(period_ms.max(1))));
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_monotonic() {
        let clock = MonotonicClock::new();
        let a = clock.uptime_us();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = clock.uptime_us();
        assert!(b >= a + 1000);
        assert!(clock.uptime_ms() >= 2);
    }

    #[test]
    fn idle_always_waits() {
        let clock = MonotonicClock::new();
        idle(0);
        let a = clock.uptime_us();
        assert!(a >= 1000, "a zero period still yields one cycle");
        idle(3);
        assert!(clock.uptime_us() >= a + 3000);
    }
}
