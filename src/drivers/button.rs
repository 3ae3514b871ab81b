//! Button gesture recognition and the button ISR entry point.
//!
//! ## Hardware
//!
//! Active-low momentary switch with internal pull-up.  The GPIO fires on
//! the falling edge; the ISR stamps the edge and pushes it onto the input
//! queue.  The main loop feeds queued edges to [`ClickDetector::on_edge`]
//! and calls [`ClickDetector::tick`] every loop iteration.
//!
//! ## Gesture detection
//!
//! | Gesture      | Condition                                          | Event          |
//! |--------------|----------------------------------------------------|----------------|
//! | Bounce       | Edge < `debounce_ms` after the last accepted edge  | none           |
//! | Double click | Second edge < `double_click_timeout_ms` after first| `DoubleClick`  |
//! | Single click | No second edge before the window closes            | `SingleClick`  |
//!
//! Timestamps are wrapping `u32` milliseconds; all comparisons use
//! `wrapping_sub`.

use embedded_hal::digital::InputPin;
use log::debug;

use crate::app::ports::ButtonPort;
use crate::events::{InputEvent, push_event};

/// Gestures emitted by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// The double-click window closed with only one click in it.
    SingleClick,
    DoubleClick,
}

/// Click state: last accepted edge, start of the open window, and whether
/// a window is open.  Owned by the foreground; never touched by the ISR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickState {
    pub last_event_ms: Option<u32>,
    pub first_click_ms: u32,
    pub awaiting_second_click: bool,
}

pub struct ClickDetector {
    debounce_ms: u32,
    double_click_timeout_ms: u32,
    state: ClickState,
}

impl ClickDetector {
    pub fn new(debounce_ms: u32, double_click_timeout_ms: u32) -> Self {
        Self {
            debounce_ms,
            double_click_timeout_ms,
            state: ClickState::default(),
        }
    }

    pub fn state(&self) -> ClickState {
        self.state
    }

    /// Feed one falling edge stamped `ts`.
    pub fn on_edge(&mut self, ts: u32) -> Option<ButtonEvent> {
        if let Some(last) = self.state.last_event_ms {
            if ts.wrapping_sub(last) < self.debounce_ms {
                debug!("button: bounce at {} ignored", ts);
                return None;
            }
        }
        self.state.last_event_ms = Some(ts);

        if !self.state.awaiting_second_click {
            self.state.first_click_ms = ts;
            self.state.awaiting_second_click = true;
            return None;
        }

        if ts.wrapping_sub(self.state.first_click_ms) < self.double_click_timeout_ms {
            self.state.awaiting_second_click = false;
            return Some(ButtonEvent::DoubleClick);
        }

        // The window expired but no tick closed it yet: this click opens a new one.
        self.state.first_click_ms = ts;
        None
    }

    /// Close an expired window.  Call every loop iteration.
    pub fn tick(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        if self.state.awaiting_second_click
            && now_ms.wrapping_sub(self.state.first_click_ms) >= self.double_click_timeout_ms
        {
            self.state.awaiting_second_click = false;
            return Some(ButtonEvent::SingleClick);
        }
        None
    }
}

/// ISR handler: register this on the button GPIO falling edge.
/// Only stamps and enqueues; safe to call from interrupt context.
pub fn button_isr_handler(now_ms: u32) {
    // A full queue drops the edge; the drop counter records it.
    let _ = push_event(InputEvent::ButtonPressed { at_ms: now_ms });
}

/// Level poll over any embedded-hal input pin wired active-low.
pub struct ActiveLowButton<P: InputPin> {
    pin: P,
}

impl<P: InputPin> ActiveLowButton<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> ButtonPort for ActiveLowButton<P> {
    fn is_pressed(&mut self) -> bool {
        // A failed read counts as released so a flaky pin never edits.
        self.pin.is_low().unwrap_or(false)
    }
}
