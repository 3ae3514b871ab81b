//! Colour persistence over a raw [`FlashPort`].
//!
//! Two layouts live here:
//!
//! - [`PersistenceStore`]: the full [`PersistedImage`] (magic, last colour,
//!   named-colour table), rewritten in one erase + program cycle on every
//!   mutation.
//! - [`PackedWordStore`]: the legacy single-word layout
//!   `hue << 16 | sat << 8 | val`, kept for boards flashed before the
//!   colour table existed.
//!
//! Neither layout rotates across pages; every write lands on the same page.
//! Erase and program are blocking and must never be called from an ISR.

pub mod image;
pub mod packed;
pub mod store;

use crate::app::ports::{FlashPort, StorageError};

pub use image::{NamedColorEntry, PersistedImage};
pub use packed::PackedWordStore;
pub use store::PersistenceStore;

/// First four bytes of a valid image ("HSV1", little-endian on flash).
pub const IMAGE_MAGIC: u32 = 0x4853_5631;

/// Number of named-colour slots.
pub const TABLE_SLOTS: usize = 10;

/// Longest accepted colour name, in bytes.
pub const NAME_MAX_LEN: usize = 16;

/// Upper bound on busy polls after an erase or program before giving up.
pub const BUSY_POLL_LIMIT: u32 = 100_000;

/// Failures of the named-colour operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Every slot is valid and none matches the name.
    TableFull,
    /// No valid entry carries the name.
    NotFound,
    /// Name longer than [`NAME_MAX_LEN`] bytes.
    NameTooLong,
    /// The write-through failed; the cached table is unchanged.
    Storage(StorageError),
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TableFull => write!(f, "color table full"),
            Self::NotFound => write!(f, "color not found"),
            Self::NameTooLong => write!(f, "name longer than {NAME_MAX_LEN} bytes"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// Spin on the controller busy flag, bounded by [`BUSY_POLL_LIMIT`].
pub(crate) fn wait_idle(flash: &impl FlashPort) -> Result<(), StorageError> {
    for _ in 0..BUSY_POLL_LIMIT {
        if !flash.is_busy() {
            return Ok(());
        }
        core::hint::spin_loop();
    }
    Err(StorageError::Timeout)
}
