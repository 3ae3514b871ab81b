//! Legacy single-word colour storage.
//!
//! One 32-bit word `hue << 16 | sat << 8 | val` at a fixed address.  A blank
//! word (`0xFFFF_FFFF`) means nothing was ever saved.  Saving skips the
//! write when the word already matches and only erases the page when the
//! word is not blank, so the first save after an erase costs no erase cycle.

use log::{debug, info, warn};

use super::wait_idle;
use crate::app::ports::{FlashPort, LastColorStore, StorageError};
use crate::color::{HUE_MAX, HsvColor, PERCENT_MAX};

const BLANK_WORD: u32 = 0xFFFF_FFFF;

pub fn pack(color: HsvColor) -> u32 {
    (u32::from(color.hue) << 16) | (u32::from(color.saturation) << 8) | u32::from(color.value)
}

/// Inverse of [`pack`].  Words that decode to an out-of-range colour
/// (a torn or foreign write) are rejected.
pub fn unpack(word: u32) -> Option<HsvColor> {
    let color = HsvColor {
        hue: (word >> 16) as u16,
        saturation: (word >> 8) as u8,
        value: word as u8,
    };
    (color.hue < HUE_MAX && color.saturation <= PERCENT_MAX && color.value <= PERCENT_MAX)
        .then_some(color)
}

pub struct PackedWordStore<F: FlashPort> {
    flash: F,
    addr: u32,
    cached: Option<HsvColor>,
}

impl<F: FlashPort> PackedWordStore<F> {
    pub fn init(flash: F, addr: u32) -> Result<Self, StorageError> {
        let word = read_word(&flash, addr)?;
        let cached = if word == BLANK_WORD { None } else { unpack(word) };
        match cached {
            Some(c) => info!("PackedWordStore: stored color {}", c),
            None if word == BLANK_WORD => info!("PackedWordStore: blank word at 0x{:08X}", addr),
            None => warn!("PackedWordStore: unusable word 0x{:08X}", word),
        }
        Ok(Self { flash, addr, cached })
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }

    pub fn into_flash(self) -> F {
        self.flash
    }
}

fn read_word(flash: &impl FlashPort, addr: u32) -> Result<u32, StorageError> {
    let mut raw = [0u8; 4];
    flash.read(addr, &mut raw)?;
    Ok(u32::from_le_bytes(raw))
}

impl<F: FlashPort> LastColorStore for PackedWordStore<F> {
    fn last_color(&self) -> Option<HsvColor> {
        self.cached
    }

    fn save_current(&mut self, color: HsvColor) -> Result<bool, StorageError> {
        let new_word = pack(color);
        let current = read_word(&self.flash, self.addr)?;
        if current == new_word {
            debug!("PackedWordStore: word unchanged, skip write");
            return Ok(false);
        }

        wait_idle(&self.flash)?;
        if current != BLANK_WORD {
            self.flash.erase_page(self.addr)?;
            wait_idle(&self.flash)?;
        }
        self.flash.program(self.addr, &new_word.to_le_bytes())?;
        wait_idle(&self.flash)?;

        self.cached = Some(color);
        info!("PackedWordStore: saved {} (0x{:08X})", color, new_word);
        Ok(true)
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::adapters::flash::FlashAdapter;

    const ADDR: u32 = 0x000F_0000;

    fn flash() -> FlashAdapter {
        FlashAdapter::in_memory(4096, 0x0010_0000)
    }

    #[test]
    fn pack_layout() {
        assert_eq!(pack(HsvColor::new(0x0123, 0x45, 0x56)), 0x0123_4556);
        assert_eq!(pack(HsvColor::new(359, 100, 100)), (359 << 16) | (100 << 8) | 100);
    }

    #[test]
    fn unpack_rejects_out_of_range() {
        assert_eq!(unpack(360 << 16), None);
        assert_eq!(unpack(101 << 8), None);
        assert_eq!(unpack(101), None);
        assert_eq!(unpack(pack(HsvColor::new(42, 7, 9))), Some(HsvColor::new(42, 7, 9)));
    }

    #[test]
    fn blank_word_reads_as_none() {
        let store = PackedWordStore::init(flash(), ADDR).unwrap();
        assert_eq!(store.last_color(), None);
    }

    #[test]
    fn first_save_programs_without_erase() {
        let mut store = PackedWordStore::init(flash(), ADDR).unwrap();
        assert_eq!(store.save_current(HsvColor::new(18, 100, 100)), Ok(true));
        assert_eq!(store.flash().erase_count(), 0);
        assert_eq!(store.flash().program_count(), 1);
    }

    #[test]
    fn unchanged_word_skips_write() {
        let mut store = PackedWordStore::init(flash(), ADDR).unwrap();
        store.save_current(HsvColor::new(18, 100, 100)).unwrap();
        assert_eq!(store.save_current(HsvColor::new(18, 100, 100)), Ok(false));
        assert_eq!(store.flash().program_count(), 1);
    }

    #[test]
    fn overwrite_erases_first_and_survives_reinit() {
        let mut store = PackedWordStore::init(flash(), ADDR).unwrap();
        store.save_current(HsvColor::new(18, 100, 100)).unwrap();
        store.save_current(HsvColor::new(200, 30, 40)).unwrap();
        assert_eq!(store.flash().erase_count(), 1);

        let store = PackedWordStore::init(store.into_flash(), ADDR).unwrap();
        assert_eq!(store.last_color(), Some(HsvColor::new(200, 30, 40)));
    }

    #[test]
    fn stuck_controller_times_out() {
        let mut store = PackedWordStore::init(flash(), ADDR).unwrap();
        store.flash().inject_busy(u32::MAX);
        assert_eq!(
            store.save_current(HsvColor::new(1, 1, 1)),
            Err(StorageError::Timeout)
        );
        assert_eq!(store.last_color(), None);
    }
}
