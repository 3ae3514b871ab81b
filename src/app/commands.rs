//! Inbound commands to the application service.
//!
//! These represent actions requested over the serial console that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use heapless::String;

use crate::color::{DriveTriple, HsvColor};
use crate::storage::NAME_MAX_LEN;

/// A colour name as accepted by the table (at most `NAME_MAX_LEN` bytes).
pub type ColorName = String<NAME_MAX_LEN>;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Set the live colour from drive values (converted to HSV).
    SetRgb(DriveTriple),

    /// Set the live colour directly.
    SetHsv(HsvColor),

    /// Store drive values under a name.
    AddRgbColor { drive: DriveTriple, name: ColorName },

    /// Store an HSV colour under a name.
    AddHsvColor { color: HsvColor, name: ColorName },

    /// Store the live colour under a name.
    AddCurrentColor(ColorName),

    /// Tombstone a named colour.
    DeleteColor(ColorName),

    /// Make a named colour live and persist it as the last colour.
    ApplyColor(ColorName),

    /// List the valid named colours.
    ListColors,

    /// Show the command summary.
    Help,
}

/// Result of a handled command, rendered to text by the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    RgbSet(DriveTriple),
    HsvSet(HsvColor),
    Stored { name: ColorName, slot: usize },
    Deleted(ColorName),
    Applied { name: ColorName, color: HsvColor },
    /// The reply body is the table itself.
    Listing,
    Help,
    TableFull,
    NotFound(ColorName),
    NameTooLong,
    StorageFault(crate::app::ports::StorageError),
}
