//! Flash adapter implementing [`FlashPort`].
//!
//! - ESP32: the `hsvstore` data partition through `esp_partition_*`.
//!   Addresses are partition-relative.
//! - RAM: pages with NOR semantics (erase to `0xFF`, program can only
//!   clear bits), operation counters, busy injection, and an optional
//!   backing file so the host simulation keeps its colours across
//!   restarts.  The target falls back to a RAM device when the partition
//!   is missing, see [`open_store_or_volatile`].

use core::cell::Cell;
use std::path::PathBuf;

use crate::app::ports::{FlashPort, StorageError};
use crate::storage::PersistenceStore;
use log::{error, info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Partition label in `partitions.csv`.
pub const PARTITION_LABEL: &core::ffi::CStr = c"hsvstore";

#[cfg(target_os = "espidf")]
const SECTOR_SIZE: usize = 4096;

enum Backend {
    #[cfg(target_os = "espidf")]
    Partition {
        partition: *const esp_partition_t,
        size: usize,
    },
    Ram {
        mem: Vec<u8>,
        page_size: usize,
        backing: Option<PathBuf>,
    },
}

pub struct FlashAdapter {
    backend: Backend,
    erase_count: u32,
    program_count: u32,
    busy_polls: Cell<u32>,
}

impl FlashAdapter {
    /// Locate the `hsvstore` data partition.
    #[cfg(target_os = "espidf")]
    pub fn open_partition() -> Result<Self, StorageError> {
        // SAFETY: lookup of a static partition table entry; the returned
        // pointer stays valid for the program lifetime.
        let partition = unsafe {
            esp_partition_find_first(
                esp_partition_type_t_ESP_PARTITION_TYPE_DATA,
                esp_partition_subtype_t_ESP_PARTITION_SUBTYPE_ANY,
                PARTITION_LABEL.as_ptr(),
            )
        };
        if partition.is_null() {
            log::error!("FlashAdapter: partition {:?} not found", PARTITION_LABEL);
            return Err(StorageError::Io);
        }
        // SAFETY: non-null pointer from esp_partition_find_first.
        let size = unsafe { (*partition).size } as usize;
        info!("FlashAdapter: partition {:?} ({} bytes)", PARTITION_LABEL, size);
        Ok(Self {
            backend: Backend::Partition { partition, size },
            erase_count: 0,
            program_count: 0,
            busy_polls: Cell::new(0),
        })
    }

    /// Blank RAM device of `size` bytes.
    pub fn in_memory(page_size: usize, size: usize) -> Self {
        info!("FlashAdapter: RAM backend ({} bytes, {}-byte pages)", size, page_size);
        Self {
            backend: Backend::Ram {
                mem: vec![0xFF; size],
                page_size,
                backing: None,
            },
            erase_count: 0,
            program_count: 0,
            busy_polls: Cell::new(0),
        }
    }

    /// RAM device mirrored to `path`.  Existing contents are loaded; a
    /// missing file starts blank.
    #[cfg(not(target_os = "espidf"))]
    pub fn with_backing_file(
        path: impl Into<PathBuf>,
        page_size: usize,
        size: usize,
    ) -> Result<Self, StorageError> {
        let path = path.into();
        let mut mem = vec![0xFF; size];
        match std::fs::read(&path) {
            Ok(bytes) => {
                let n = bytes.len().min(size);
                mem[..n].copy_from_slice(&bytes[..n]);
                info!("FlashAdapter: loaded {} bytes from {}", n, path.display());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("FlashAdapter: {} absent, starting blank", path.display());
            }
            Err(e) => {
                warn!("FlashAdapter: cannot read {}: {}", path.display(), e);
                return Err(StorageError::Io);
            }
        }
        Ok(Self {
            backend: Backend::Ram {
                mem,
                page_size,
                backing: Some(path),
            },
            erase_count: 0,
            program_count: 0,
            busy_polls: Cell::new(0),
        })
    }

    pub fn erase_count(&self) -> u32 {
        self.erase_count
    }

    pub fn program_count(&self) -> u32 {
        self.program_count
    }

    /// Report busy for the next `polls` calls to `is_busy`.
    pub fn inject_busy(&self, polls: u32) {
        self.busy_polls.set(polls);
    }

    fn device_size(&self) -> usize {
        match &self.backend {
            #[cfg(target_os = "espidf")]
            Backend::Partition { size, .. } => *size,
            Backend::Ram { mem, .. } => mem.len(),
        }
    }

    fn check_range(&self, addr: u32, len: usize) -> Result<usize, StorageError> {
        let start = addr as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.device_size() => Ok(start),
            _ => Err(StorageError::OutOfBounds),
        }
    }

}

/// Mirror the RAM contents to the backing file, if one is attached.
fn sync_backing(mem: &[u8], backing: Option<&PathBuf>) -> Result<(), StorageError> {
    if let Some(path) = backing {
        std::fs::write(path, mem).map_err(|e| {
            warn!("FlashAdapter: write to {} failed: {}", path.display(), e);
            StorageError::Io
        })?;
    }
    Ok(())
}

impl FlashPort for FlashAdapter {
    fn page_size(&self) -> usize {
        match &self.backend {
            #[cfg(target_os = "espidf")]
            Backend::Partition { .. } => SECTOR_SIZE,
            Backend::Ram { page_size, .. } => *page_size,
        }
    }

    fn read(&self, addr: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        let start = self.check_range(addr, buf.len())?;

        match &self.backend {
            #[cfg(target_os = "espidf")]
            Backend::Partition { partition, .. } => {
                // SAFETY: range checked against the partition size; buf is a
                // valid writable slice of the given length.
                let ret = unsafe {
                    esp_partition_read(*partition, start, buf.as_mut_ptr().cast(), buf.len())
                };
                if ret != ESP_OK {
                    warn!("FlashAdapter: read @0x{:X} failed ({})", start, ret);
                    return Err(StorageError::Io);
                }
            }
            Backend::Ram { mem, .. } => buf.copy_from_slice(&mem[start..start + buf.len()]),
        }
        Ok(())
    }

    fn erase_page(&mut self, addr: u32) -> Result<(), StorageError> {
        let page = self.page_size();
        let start = self.check_range(addr, 0)? / page * page;
        self.check_range(start as u32, page)?;

        match &mut self.backend {
            #[cfg(target_os = "espidf")]
            Backend::Partition { partition, .. } => {
                // SAFETY: page-aligned range inside the partition.
                let ret = unsafe { esp_partition_erase_range(*partition, start, page) };
                if ret != ESP_OK {
                    warn!("FlashAdapter: erase @0x{:X} failed ({})", start, ret);
                    return Err(StorageError::Io);
                }
            }
            Backend::Ram { mem, backing, .. } => {
                mem[start..start + page].fill(0xFF);
                sync_backing(mem, backing.as_ref())?;
            }
        }

        self.erase_count = self.erase_count.wrapping_add(1);
        Ok(())
    }

    fn program(&mut self, addr: u32, data: &[u8]) -> Result<(), StorageError> {
        let start = self.check_range(addr, data.len())?;

        match &mut self.backend {
            #[cfg(target_os = "espidf")]
            Backend::Partition { partition, .. } => {
                // SAFETY: range checked; data is a valid readable slice.
                let ret = unsafe {
                    esp_partition_write(*partition, start, data.as_ptr().cast(), data.len())
                };
                if ret != ESP_OK {
                    warn!("FlashAdapter: program @0x{:X} failed ({})", start, ret);
                    return Err(StorageError::Io);
                }
            }
            Backend::Ram { mem, backing, .. } => {
                for (cell, byte) in mem[start..start + data.len()].iter_mut().zip(data) {
                    *cell &= *byte;
                }
                sync_backing(mem, backing.as_ref())?;
            }
        }

        self.program_count = self.program_count.wrapping_add(1);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        let n = self.busy_polls.get();
        if n == 0 {
            return false;
        }
        self.busy_polls.set(n - 1);
        true
    }
}

/// Open the colour store on `open()`'s device, or on a blank one-page RAM
/// device when that fails.  The second value carries the original failure
/// so the caller can report it; the light still boots on defaults.
pub fn open_store_or_volatile(
    open: impl FnOnce() -> Result<FlashAdapter, StorageError>,
    base_addr: u32,
    page_size: usize,
) -> Result<(PersistenceStore<FlashAdapter>, Option<StorageError>), StorageError> {
    match open().and_then(|flash| PersistenceStore::init(flash, base_addr)) {
        Ok(store) => Ok((store, None)),
        Err(e) => {
            error!("FlashAdapter: store unavailable ({}), colours will not survive a reset", e);
            let store = PersistenceStore::init(FlashAdapter::in_memory(page_size, page_size), 0)?;
            Ok((store, Some(e)))
        }
    }
}
