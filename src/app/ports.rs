//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (LEDs, button, flash, event sinks) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::color::{DriveTriple, HsvColor};

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → PWM)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the RGB LED and the single-channel mode indicator.
pub trait IndicatorPort {
    /// Apply drive values to the RGB channels.  Each channel is `0..=TOP_VALUE`.
    fn set_rgb(&mut self, drive: DriveTriple);

    /// Set the mode indicator intensity (`0..=TOP_VALUE`).
    fn set_indicator(&mut self, intensity: u16);
}

// ───────────────────────────────────────────────────────────────
// Button port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Level poll for the (active-low) push-button.  Edges arrive through the
/// event queue; this is only used for hold-to-edit.
pub trait ButtonPort {
    fn is_pressed(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Flash port (driven adapter: domain ↔ raw erase/program device)
// ───────────────────────────────────────────────────────────────

/// Raw NOR-style block device.
///
/// Erased bytes read `0xFF`; `program` may only clear bits.  Addresses are
/// relative to the device (or partition) start.  Implementations block
/// until the operation is issued; completion is observed via [`is_busy`].
///
/// [`is_busy`]: FlashPort::is_busy
pub trait FlashPort {
    /// Erase granularity in bytes.
    fn page_size(&self) -> usize;

    fn read(&self, addr: u32, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Erase the page containing `addr` to `0xFF`.
    fn erase_page(&mut self, addr: u32) -> Result<(), StorageError>;

    fn program(&mut self, addr: u32, data: &[u8]) -> Result<(), StorageError>;

    /// Controller busy flag.  Devices with synchronous writes never report busy.
    fn is_busy(&self) -> bool {
        false
    }
}

/// Errors raised by a [`FlashPort`] or by the image codec above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Address range falls outside the device.
    OutOfBounds,
    /// The controller stayed busy past the poll bound.
    Timeout,
    /// The image did not fit the page or could not be serialised.
    Encode,
    /// The underlying driver reported a failure.
    Io,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "address out of bounds"),
            Self::Timeout => write!(f, "flash busy timeout"),
            Self::Encode => write!(f, "image encode failed"),
            Self::Io => write!(f, "flash I/O error"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Colour store ports (domain ↔ persistence)
// ───────────────────────────────────────────────────────────────

/// Durable storage for the last active colour.
pub trait LastColorStore {
    /// The colour read at init, or the last one saved since.
    /// `None` when nothing valid has been stored.
    fn last_color(&self) -> Option<HsvColor>;

    /// Persist `color`.  Returns `Ok(false)` when it equals the stored
    /// value and nothing was written.
    fn save_current(&mut self, color: HsvColor) -> Result<bool, StorageError>;
}

/// Named colour table on top of [`LastColorStore`].
pub trait ColorTable: LastColorStore {
    /// Store under `name`, replacing an existing entry of the same name.
    /// Returns the slot used.
    fn add_color(&mut self, name: &str, color: HsvColor) -> Result<usize, StoreError>;

    /// Tombstone the entry under `name`.  Returns the slot freed.
    fn delete_color(&mut self, name: &str) -> Result<usize, StoreError>;

    fn get_color(&self, name: &str) -> Option<HsvColor>;

    /// Valid entries as `(slot, name, colour)` in slot order.
    fn entries(&self) -> impl Iterator<Item = (usize, &str, HsvColor)>;
}

pub use crate::storage::StoreError;

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / console)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
