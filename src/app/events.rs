//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder).

use crate::app::ports::StorageError;
use crate::color::HsvColor;
use crate::fsm::InputMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (initial mode and colour, and whether the
    /// colour came from storage).
    Started {
        mode: InputMode,
        color: HsvColor,
        restored: bool,
    },

    /// A double click moved the input mode.
    ModeChanged { from: InputMode, to: InputMode },

    /// A click window closed without a second click.
    SingleClick,

    /// The live colour changed (edit step or console).
    ColorChanged(HsvColor),

    /// The live colour was written to flash.
    ColorSaved(HsvColor),

    /// A named-colour slot was written or tombstoned.
    TableUpdated { slot: usize },

    /// A flash write failed; the cached state is unchanged.
    StorageFault(StorageError),
}
