//! Interrupt-driven input events.
//!
//! Events are produced by:
//! - the button GPIO ISR (falling edge, timestamped in the ISR)
//! - the console reader (one event per received byte)
//!
//! and consumed by the main loop, which drains them in FIFO order before
//! each tick.  All multi-step logic (mode changes, flash writes) happens in
//! the consumer; producers only record and enqueue.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Button ISR  │────▶│  EventQueue  │────▶│  Main Loop   │
//! │ Console RX  │────▶│ (crit. sect.)│     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 32;

/// Input event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Falling edge on the button GPIO, stamped at ISR time.
    ButtonPressed { at_ms: u32 },
    /// One byte received on the serial console.
    ConsoleByte(u8),
}

/// Bounded FIFO shared between interrupt producers and the main loop.
/// A full queue drops the new event and counts the drop.
pub struct EventQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, InputEvent, N>,
    dropped: AtomicU32,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueue an event.  Safe to call from ISR context.
    /// Returns `false` if the queue is full (event dropped).
    pub fn push(&self, event: InputEvent) -> bool {
        if self.channel.try_send(event).is_ok() {
            return true;
        }
        self.dropped.fetch_add(1, Ordering::Relaxed);
        false
    }

    /// Next pending event, if any.
    pub fn pop(&self) -> Option<InputEvent> {
        self.channel.try_receive().ok()
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(InputEvent)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Events lost to a full queue since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// The firmware's input queue.  ISRs and the console reader push here.
pub static INPUT_EVENTS: EventQueue<EVENT_QUEUE_CAP> = EventQueue::new();

/// Push onto [`INPUT_EVENTS`].
pub fn push_event(event: InputEvent) -> bool {
    INPUT_EVENTS.push(event)
}

/// Drain [`INPUT_EVENTS`] into a callback.
pub fn drain_events(handler: impl FnMut(InputEvent)) {
    INPUT_EVENTS.drain(handler);
}

/// Rate limiter for overflow warnings.  Polled every loop iteration with
/// the running drop count; reports only when the count reaches a new
/// power-of-two bucket, so a steady flood logs O(log n) lines.
#[derive(Debug, Default)]
pub struct DropWatch {
    reported: u32,
}

impl DropWatch {
    pub const fn new() -> Self {
        Self { reported: 0 }
    }

    /// The drop total to report, if it is worth a new warning.
    pub fn poll(&mut self, dropped: u32) -> Option<u32> {
        if dropped == self.reported {
            return None;
        }
        let bucket = |n: u32| n.checked_ilog2();
        let fresh = bucket(dropped) > bucket(self.reported);
        self.reported = dropped;
        fresh.then_some(dropped)
    }
}
