//! On-flash image codec.
//!
//! Layout at the storage base address:
//!
//! ```text
//! ┌────────────┬──────────────────────────────────────────────┐
//! │ magic (LE) │ postcard { last_color, table[TABLE_SLOTS] }   │
//! │  4 bytes   │  ≤ IMAGE_MAX_LEN - 4 bytes                    │
//! └────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! No checksum, no version field.  A wrong magic (including a blank page,
//! which reads `0xFFFF_FFFF`) means there is no prior data.

use heapless::String;
use serde::{Deserialize, Serialize};

use super::{IMAGE_MAGIC, NAME_MAX_LEN, TABLE_SLOTS};
use crate::app::ports::StorageError;
use crate::color::{HUE_MAX, HsvColor, PERCENT_MAX};

const MAGIC_LEN: usize = 4;

/// Bytes read back at init and the size of the encode scratch buffer.
/// Comfortably above the worst case of a full table with 16-byte names.
pub const IMAGE_MAX_LEN: usize = 512;

/// One slot of the named-colour table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NamedColorEntry {
    pub name: String<NAME_MAX_LEN>,
    pub color: HsvColor,
    /// `false` marks a free or deleted slot.  Deleted slots keep their
    /// stale name and colour until reused.
    pub valid: bool,
}

/// Everything persisted, written as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedImage {
    pub last_color: Option<HsvColor>,
    pub table: [NamedColorEntry; TABLE_SLOTS],
}

impl PersistedImage {
    /// Serialise into `buf`, returning the used prefix.
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a [u8], StorageError> {
        if buf.len() < MAGIC_LEN {
            return Err(StorageError::Encode);
        }
        buf[..MAGIC_LEN].copy_from_slice(&IMAGE_MAGIC.to_le_bytes());
        let body_len = postcard::to_slice(self, &mut buf[MAGIC_LEN..])
            .map_err(|_| StorageError::Encode)?
            .len();
        Ok(&buf[..MAGIC_LEN + body_len])
    }

    /// Parse an image read back from flash.  Trailing bytes (erased flash
    /// after the image) are ignored.  Returns `None` for anything that is
    /// not a well-formed image.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (magic, body) = bytes.split_first_chunk::<MAGIC_LEN>()?;
        if u32::from_le_bytes(*magic) != IMAGE_MAGIC {
            return None;
        }
        let (image, _rest) = postcard::take_from_bytes::<Self>(body).ok()?;
        image.is_well_formed().then_some(image)
    }

    fn is_well_formed(&self) -> bool {
        let color_ok = |c: &HsvColor| {
            c.hue < HUE_MAX && c.saturation <= PERCENT_MAX && c.value <= PERCENT_MAX
        };
        self.last_color.as_ref().is_none_or(color_ok)
            && self
                .table
                .iter()
                .filter(|e| e.valid)
                .all(|e| color_ok(&e.color))
    }

    /// Slot of the valid entry named `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.table
            .iter()
            .position(|e| e.valid && e.name.as_str() == name)
    }

    /// First slot available for a new entry.
    pub fn first_free(&self) -> Option<usize> {
        self.table.iter().position(|e| !e.valid)
    }
}
