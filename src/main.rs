//! hsvlight firmware: main entry point.
//!
//! Hexagonal architecture with an interrupt-fed event queue and a 1 ms
//! foreground loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        FlashAdapter     LogEventSink          │
//! │  (Indicator+Button)     (FlashPort)      (EventSink)           │
//! │  ConsoleAdapter         MonotonicClock                         │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  ClickDetector · FSM · IndicatorEngine · Store         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use hsvlight::adapters::console::{ConsoleAdapter, ConsoleOut};
use hsvlight::adapters::flash::{self, FlashAdapter};
use hsvlight::adapters::hardware::HardwareAdapter;
use hsvlight::adapters::log_sink::LogEventSink;
use hsvlight::adapters::time::{self, MonotonicClock};
use hsvlight::app::events::AppEvent;
use hsvlight::app::ports::{EventSink, StorageError};
use hsvlight::app::service::AppService;
use hsvlight::config::SystemConfig;
use hsvlight::console::ConsoleSession;
use hsvlight::drivers::hw_init;
use hsvlight::error::Error;
use hsvlight::events::{self, DropWatch, InputEvent};

/// Flash image of the host simulation, relative to the working directory.
#[cfg(not(target_os = "espidf"))]
const HOST_FLASH_FILE: &str = "hsvlight-flash.bin";
/// Simulated device size; must cover `storage_base_addr` plus one page.
#[cfg(not(target_os = "espidf"))]
const HOST_FLASH_SIZE: usize = 0x0010_0000;

fn main() -> Result<()> {
    // ── 1. Bootstrap + logging ────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  hsvlight v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();
    info!(
        "Config: device_id={} debounce={}ms double_click={}ms step={}ms",
        config.device_id,
        config.debounce_ms,
        config.double_click_timeout_ms,
        config.value_change_interval_ms
    );

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(Error::from)?;
    if let Err(e) = hw_init::init_isr_service() {
        // The console still works without the button.
        log::error!("ISR service init failed: {}, continuing without button", e);
    }
    let mut hw = HardwareAdapter::from_pins();
    hw.all_off();

    // ── 4. Persistent store ───────────────────────────────────
    // A missing or unreadable store degrades to RAM: the light still runs.
    let (store, store_fault) = flash::open_store_or_volatile(
        || open_flash(&config),
        config.storage_base_addr,
        config.storage_page_size as usize,
    )
    .map_err(Error::from)?;

    // ── 5. Application service ────────────────────────────────
    let tick_ms = config.tick_interval_ms;
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(config, store);
    app.start(&mut hw, &mut sink);
    if let Some(e) = store_fault {
        sink.emit(&AppEvent::StorageFault(e));
    }

    // ── 6. Serial console ─────────────────────────────────────
    let mut out = ConsoleOut::new();
    let mut session = ConsoleSession::new();
    let _console = match ConsoleAdapter::start() {
        Ok(c) => Some(c),
        Err(e) => {
            warn!("console reader not started: {}", e);
            None
        }
    };
    if session.open(&mut out).is_err() {
        warn!("console: banner write failed");
    }

    info!("System ready. Entering event loop.");

    // ── 7. Event loop ─────────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut drops = DropWatch::new();
    loop {
        events::drain_events(|event| match event {
            InputEvent::ButtonPressed { at_ms } => app.on_button_edge(at_ms, &mut hw, &mut sink),
            InputEvent::ConsoleByte(byte) => {
                if session
                    .on_byte(byte, &mut app, &mut hw, &mut sink, &mut out)
                    .is_err()
                {
                    warn!("console: write failed");
                }
            }
        });

        app.tick(clock.uptime_ms(), &mut hw, &mut sink);

        if let Some(dropped) = drops.poll(events::INPUT_EVENTS.dropped()) {
            warn!("event queue overflow: {} events dropped so far", dropped);
        }

        time::idle(tick_ms);
    }
}

/// Defaults on target; defaults or the JSON override on the host.
fn load_config() -> SystemConfig {
    #[cfg(not(target_os = "espidf"))]
    let loaded = SystemConfig::load_host();
    #[cfg(target_os = "espidf")]
    let loaded: Result<SystemConfig, hsvlight::config::ConfigError> = Ok(SystemConfig::default());

    match loaded.and_then(|cfg| cfg.validate().map(|()| cfg)) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config rejected ({}), using defaults", e);
            SystemConfig::default()
        }
    }
}

/// The `hsvstore` partition on target.
#[cfg(target_os = "espidf")]
fn open_flash(_config: &SystemConfig) -> Result<FlashAdapter, StorageError> {
    FlashAdapter::open_partition()
}

/// File-backed simulation on the host.
#[cfg(not(target_os = "espidf"))]
fn open_flash(config: &SystemConfig) -> Result<FlashAdapter, StorageError> {
    FlashAdapter::with_backing_file(
        HOST_FLASH_FILE,
        config.storage_page_size as usize,
        HOST_FLASH_SIZE,
    )
}
