//! System configuration parameters
//!
//! All tunable timing and identity parameters for the light.  Layout
//! constants (PWM scale, table size, name length) are compile-time and
//! live next to the code that owns them.

use serde::{Deserialize, Serialize};

use crate::color::{HUE_MAX, HsvColor, PERCENT_MAX};

/// Environment variable naming a JSON override file (host builds).
pub const CONFIG_ENV_VAR: &str = "HSVLIGHT_CONFIG";

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Identity ---
    /// Device number; seeds the default hue and the boot identity blink.
    pub device_id: u32,

    // --- Button ---
    /// Edges closer than this to the previous accepted edge are bounce.
    pub debounce_ms: u32,
    /// Window in which a second click completes a double click.
    pub double_click_timeout_ms: u32,
    /// Step interval while the button is held in an edit mode.
    pub value_change_interval_ms: u32,

    // --- Indicator ---
    /// Half period of the hue-mode blink.
    pub blink_slow_ms: u32,
    /// Half period of the saturation-mode blink.
    pub blink_fast_ms: u32,
    /// Indicator intensity when lit (0-1000).
    pub indicator_level: u16,
    /// Play the device-id digits on the indicator at boot.
    pub identity_blink_on_boot: bool,

    // --- Timing ---
    /// Foreground loop period (milliseconds)
    pub tick_interval_ms: u32,

    // --- Storage ---
    /// Image address within the flash device.
    pub storage_base_addr: u32,
    /// Erase page size of the flash device.
    pub storage_page_size: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            device_id: 7205,

            debounce_ms: 50,
            double_click_timeout_ms: 400,
            value_change_interval_ms: 50,

            blink_slow_ms: 1000,
            blink_fast_ms: 200,
            indicator_level: 1000,
            identity_blink_on_boot: true,

            tick_interval_ms: 1,

            // The partition adapter is partition-relative; the host
            // simulation mirrors the legacy absolute address.
            #[cfg(target_os = "espidf")]
            storage_base_addr: 0,
            #[cfg(not(target_os = "espidf"))]
            storage_base_addr: 0x000F_0000,
            storage_page_size: 4096,
        }
    }
}

impl SystemConfig {
    /// Boot colour when nothing is stored: hue at `device_id % 100` percent
    /// of the colour wheel, full saturation and brightness.
    pub fn default_color(&self) -> HsvColor {
        let percent = (self.device_id % 100) as u16;
        HsvColor::new(percent * HUE_MAX / 100, PERCENT_MAX, PERCENT_MAX)
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.debounce_ms) {
            return Err(ConfigError::ValidationFailed("debounce_ms must be 1–1000"));
        }
        if self.double_click_timeout_ms <= self.debounce_ms
            || self.double_click_timeout_ms > 5000
        {
            return Err(ConfigError::ValidationFailed(
                "double_click_timeout_ms must be above debounce_ms and at most 5000",
            ));
        }
        if !(1..=10_000).contains(&self.value_change_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "value_change_interval_ms must be 1–10000",
            ));
        }
        if !(1..=60_000).contains(&self.blink_slow_ms) || !(1..=60_000).contains(&self.blink_fast_ms)
        {
            return Err(ConfigError::ValidationFailed("blink periods must be 1–60000"));
        }
        if self.indicator_level > crate::color::TOP_VALUE {
            return Err(ConfigError::ValidationFailed("indicator_level must be 0–1000"));
        }
        if !(1..=100).contains(&self.tick_interval_ms) {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be 1–100"));
        }
        if self.storage_page_size == 0 || !self.storage_page_size.is_power_of_two() {
            return Err(ConfigError::ValidationFailed(
                "storage_page_size must be a power of two",
            ));
        }
        if self.storage_base_addr % self.storage_page_size != 0 {
            return Err(ConfigError::ValidationFailed(
                "storage_base_addr must be page aligned",
            ));
        }
        Ok(())
    }

    /// Parse a JSON override.  Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults, or the file named by [`CONFIG_ENV_VAR`] when set.
    #[cfg(not(target_os = "espidf"))]
    pub fn load_host() -> Result<Self, ConfigError> {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::IoError)?;
        log::info!("config: override loaded from {}", path);
        Self::from_json(&text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field is out of range.
    ValidationFailed(&'static str),
    /// The override could not be parsed.
    Corrupted,
    /// The override file could not be read.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::IoError => write!(f, "config I/O error"),
        }
    }
}
