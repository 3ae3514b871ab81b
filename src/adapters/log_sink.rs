//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC on target, stderr on the host).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                mode,
                color,
                restored,
            } => {
                info!(
                    "START | mode={:?} | {} | source={}",
                    mode,
                    color,
                    if *restored { "flash" } else { "default" }
                );
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {:?} -> {:?}", from, to);
            }
            AppEvent::SingleClick => {
                debug!("CLICK | single (ignored)");
            }
            AppEvent::ColorChanged(color) => {
                debug!("COLOR | {}", color);
            }
            AppEvent::ColorSaved(color) => {
                info!("SAVE | {}", color);
            }
            AppEvent::TableUpdated { slot } => {
                info!("TABLE | slot {} written", slot);
            }
            AppEvent::StorageFault(e) => {
                warn!("FAULT | storage: {}", e);
            }
        }
    }
}
