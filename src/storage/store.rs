//! Write-through persistence of the full [`PersistedImage`].
//!
//! The store keeps a cached copy of the image.  Every mutation builds the
//! next image, writes it (erase page, program image, poll until idle) and
//! only then replaces the cache, so a failed write leaves the cache equal
//! to what the caller saw before.

use log::{debug, info, warn};

use super::image::{IMAGE_MAX_LEN, NamedColorEntry, PersistedImage};
use super::{NAME_MAX_LEN, StoreError, wait_idle};
use crate::app::ports::{ColorTable, FlashPort, LastColorStore, StorageError};
use crate::color::HsvColor;

pub struct PersistenceStore<F: FlashPort> {
    flash: F,
    base_addr: u32,
    cache: PersistedImage,
    page_writes: u32,
}

impl<F: FlashPort> PersistenceStore<F> {
    /// Read the image at `base_addr` and adopt it if the magic matches.
    /// Otherwise start from an empty image without writing anything.
    pub fn init(flash: F, base_addr: u32) -> Result<Self, StorageError> {
        let mut buf = [0u8; IMAGE_MAX_LEN];
        flash.read(base_addr, &mut buf)?;

        let cache = match PersistedImage::decode(&buf) {
            Some(image) => {
                let used = image.table.iter().filter(|e| e.valid).count();
                info!(
                    "PersistenceStore: image adopted (last={:?}, {} named colors)",
                    image.last_color, used
                );
                image
            }
            None => {
                info!("PersistenceStore: no prior image at 0x{:08X}", base_addr);
                PersistedImage::default()
            }
        };

        Ok(Self {
            flash,
            base_addr,
            cache,
            page_writes: 0,
        })
    }

    /// Number of full-page rewrites since init.
    pub fn page_writes(&self) -> u32 {
        self.page_writes
    }

    pub fn image(&self) -> &PersistedImage {
        &self.cache
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }

    /// Give back the flash device (e.g. to re-init after a simulated reset).
    pub fn into_flash(self) -> F {
        self.flash
    }

    fn commit(&mut self, next: PersistedImage) -> Result<(), StorageError> {
        let mut buf = [0xFFu8; IMAGE_MAX_LEN];
        let len = next.encode(&mut buf)?.len();
        // Pad to a word boundary; the padding stays at the erased value.
        let len = len.next_multiple_of(4);
        if len > self.flash.page_size() {
            return Err(StorageError::Encode);
        }

        wait_idle(&self.flash)?;
        self.flash.erase_page(self.base_addr)?;
        wait_idle(&self.flash)?;
        self.flash.program(self.base_addr, &buf[..len])?;
        wait_idle(&self.flash)?;

        self.cache = next;
        self.page_writes = self.page_writes.wrapping_add(1);
        debug!("PersistenceStore: image written ({} bytes)", len);
        Ok(())
    }
}

impl<F: FlashPort> LastColorStore for PersistenceStore<F> {
    fn last_color(&self) -> Option<HsvColor> {
        self.cache.last_color
    }

    fn save_current(&mut self, color: HsvColor) -> Result<bool, StorageError> {
        if self.cache.last_color == Some(color) {
            debug!("PersistenceStore: {} unchanged, skip write", color);
            return Ok(false);
        }
        let mut next = self.cache.clone();
        next.last_color = Some(color);
        self.commit(next).inspect_err(|e| {
            warn!("PersistenceStore: save of {} failed: {}", color, e);
        })?;
        info!("PersistenceStore: last color saved ({})", color);
        Ok(true)
    }
}

impl<F: FlashPort> ColorTable for PersistenceStore<F> {
    fn add_color(&mut self, name: &str, color: HsvColor) -> Result<usize, StoreError> {
        if name.len() > NAME_MAX_LEN {
            return Err(StoreError::NameTooLong);
        }
        let slot = self
            .cache
            .find(name)
            .or_else(|| self.cache.first_free())
            .ok_or(StoreError::TableFull)?;

        let mut entry_name = heapless::String::new();
        entry_name
            .push_str(name)
            .map_err(|()| StoreError::NameTooLong)?;

        let mut next = self.cache.clone();
        next.table[slot] = NamedColorEntry {
            name: entry_name,
            color,
            valid: true,
        };
        self.commit(next)?;
        info!("PersistenceStore: '{}' stored in slot {} ({})", name, slot, color);
        Ok(slot)
    }

    fn delete_color(&mut self, name: &str) -> Result<usize, StoreError> {
        let slot = self.cache.find(name).ok_or(StoreError::NotFound)?;
        let mut next = self.cache.clone();
        next.table[slot].valid = false;
        self.commit(next)?;
        info!("PersistenceStore: '{}' deleted from slot {}", name, slot);
        Ok(slot)
    }

    fn get_color(&self, name: &str) -> Option<HsvColor> {
        self.cache.find(name).map(|slot| self.cache.table[slot].color)
    }

    fn entries(&self) -> impl Iterator<Item = (usize, &str, HsvColor)> {
        self.cache
            .table
            .iter()
            .enumerate()
            .filter(|(_, e)| e.valid)
            .map(|(slot, e)| (slot, e.name.as_str(), e.color))
    }
}
