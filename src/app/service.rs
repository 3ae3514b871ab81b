//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the mode FSM, the click detector, the indicator
//! engine, the colour store and the shared [`DeviceState`].  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!   ButtonPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                  │        AppService         │
//! IndicatorPort ◀──│ Clicks · FSM · Indicator  │◀──▶ ColorTable
//!                  └──────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::color::{DriveTriple, HsvColor};
use crate::config::SystemConfig;
use crate::drivers::button::{ButtonEvent, ClickDetector};
use crate::drivers::led_patterns::IndicatorEngine;
use crate::fsm::context::DeviceState;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, InputMode};
use crate::storage::StoreError;

use super::commands::{AppCommand, ColorName, CommandReply};
use super::events::AppEvent;
use super::ports::{ButtonPort, ColorTable, EventSink, IndicatorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService<S: ColorTable> {
    fsm: Fsm,
    ctx: DeviceState,
    clicks: ClickDetector,
    indicator: IndicatorEngine,
    store: S,
    restored: bool,
    last_tick_ms: Option<u32>,
}

impl<S: ColorTable> AppService<S> {
    /// Construct the service around an initialised store.  The boot colour
    /// is the stored last colour, or the configured default.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig, store: S) -> Self {
        let stored = store.last_color();
        let color = stored.unwrap_or_else(|| config.default_color());
        let clicks = ClickDetector::new(config.debounce_ms, config.double_click_timeout_ms);
        let indicator =
            IndicatorEngine::new(config.indicator_level, config.blink_slow_ms, config.blink_fast_ms);
        let ctx = DeviceState::new(config, color);

        Self {
            fsm: Fsm::new(build_state_table(), InputMode::NoInput),
            ctx,
            clicks,
            indicator,
            store,
            restored: stored.is_some(),
            last_tick_ms: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter NoInput, show the boot colour and start the identity blink.
    pub fn start(&mut self, hw: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        if self.ctx.config.identity_blink_on_boot {
            self.indicator.play_identity(self.ctx.config.device_id);
        }
        hw.set_rgb(self.ctx.drive);
        hw.set_indicator(0);

        sink.emit(&AppEvent::Started {
            mode: self.fsm.current_mode(),
            color: self.ctx.color,
            restored: self.restored,
        });
        info!(
            "AppService started: {} ({})",
            self.ctx.color,
            if self.restored { "restored" } else { "default" }
        );
    }

    // ── Input ─────────────────────────────────────────────────

    /// Feed one debounced-or-not falling edge stamped in the ISR.
    pub fn on_button_edge(
        &mut self,
        at_ms: u32,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        if self.clicks.on_edge(at_ms) == Some(ButtonEvent::DoubleClick) {
            self.ctx.now_ms = at_ms;
            self.advance_mode(hw, sink);
        }
    }

    /// Run one foreground cycle: click timeout, hold-to-edit, indicator.
    ///
    /// The `hw` parameter satisfies **both** [`IndicatorPort`] and
    /// [`ButtonPort`]: this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl IndicatorPort + ButtonPort),
        sink: &mut impl EventSink,
    ) {
        let delta_ms = self.last_tick_ms.map_or(0, |last| now_ms.wrapping_sub(last));
        self.last_tick_ms = Some(now_ms);
        self.ctx.now_ms = now_ms;

        // 1. Close an expired click window (single click: no action)
        if self.clicks.tick(now_ms) == Some(ButtonEvent::SingleClick) {
            debug!("single click at {} ignored", now_ms);
            sink.emit(&AppEvent::SingleClick);
        }

        // 2. Mode logic (hold-to-edit)
        self.ctx.button_held = self.fsm.current_mode().is_edit() && hw.is_pressed();
        let before = self.ctx.color;
        self.fsm.tick(&mut self.ctx);
        if self.ctx.color != before {
            hw.set_rgb(self.ctx.drive);
            sink.emit(&AppEvent::ColorChanged(self.ctx.color));
        }
        self.flush_pending_save(sink);

        // 3. Indicator
        self.indicator.set_pattern(self.ctx.indicator);
        hw.set_indicator(self.indicator.tick(delta_ms));
    }

    /// Cycle to the next input mode.  Leaving Brightness persists the colour.
    pub fn advance_mode(&mut self, hw: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        let from = self.fsm.current_mode();
        let to = self.fsm.advance(&mut self.ctx);
        sink.emit(&AppEvent::ModeChanged { from, to });
        self.flush_pending_save(sink);

        self.indicator.set_pattern(self.ctx.indicator);
        hw.set_indicator(self.indicator.tick(0));
    }

    /// Replace the live colour without persisting it.
    pub fn set_color(
        &mut self,
        color: HsvColor,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        self.ctx.set_color(color);
        hw.set_rgb(self.ctx.drive);
        sink.emit(&AppEvent::ColorChanged(color));
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a console command.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> CommandReply {
        match cmd {
            AppCommand::SetRgb(drive) => {
                self.set_color(drive.to_hsv(), hw, sink);
                CommandReply::RgbSet(drive)
            }
            AppCommand::SetHsv(color) => {
                self.set_color(color, hw, sink);
                CommandReply::HsvSet(color)
            }
            AppCommand::AddRgbColor { drive, name } => self.add_named(name, drive.to_hsv(), sink),
            AppCommand::AddHsvColor { color, name } => self.add_named(name, color, sink),
            AppCommand::AddCurrentColor(name) => self.add_named(name, self.ctx.color, sink),
            AppCommand::DeleteColor(name) => match self.store.delete_color(&name) {
                Ok(slot) => {
                    info!("color '{}' deleted", name);
                    sink.emit(&AppEvent::TableUpdated { slot });
                    CommandReply::Deleted(name)
                }
                Err(e) => self.store_failure(e, name, sink),
            },
            AppCommand::ApplyColor(name) => self.apply_named(name, hw, sink),
            AppCommand::ListColors => CommandReply::Listing,
            AppCommand::Help => CommandReply::Help,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> InputMode {
        self.fsm.current_mode()
    }

    pub fn color(&self) -> HsvColor {
        self.ctx.color
    }

    pub fn drive(&self) -> DriveTriple {
        self.ctx.drive
    }

    /// Whether the boot colour came from storage.
    pub fn restored(&self) -> bool {
        self.restored
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hand back the store (e.g. to simulate a reboot in tests).
    pub fn into_store(self) -> S {
        self.store
    }

    // ── Internal ──────────────────────────────────────────────

    fn flush_pending_save(&mut self, sink: &mut impl EventSink) {
        if !self.ctx.save_pending {
            return;
        }
        // One attempt per completed edit cycle; a failure is reported, not retried.
        self.ctx.save_pending = false;
        match self.store.save_current(self.ctx.color) {
            Ok(true) => sink.emit(&AppEvent::ColorSaved(self.ctx.color)),
            Ok(false) => debug!("edit cycle ended on the stored color"),
            Err(e) => {
                warn!("saving {} failed: {}", self.ctx.color, e);
                sink.emit(&AppEvent::StorageFault(e));
            }
        }
    }

    fn add_named(
        &mut self,
        name: ColorName,
        color: HsvColor,
        sink: &mut impl EventSink,
    ) -> CommandReply {
        match self.store.add_color(&name, color) {
            Ok(slot) => {
                sink.emit(&AppEvent::TableUpdated { slot });
                CommandReply::Stored { name, slot }
            }
            Err(e) => self.store_failure(e, name, sink),
        }
    }

    fn apply_named(
        &mut self,
        name: ColorName,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> CommandReply {
        let Some(color) = self.store.get_color(&name) else {
            return CommandReply::NotFound(name);
        };
        self.set_color(color, hw, sink);
        match self.store.save_current(color) {
            Ok(saved) => {
                if saved {
                    sink.emit(&AppEvent::ColorSaved(color));
                }
                CommandReply::Applied { name, color }
            }
            Err(e) => {
                sink.emit(&AppEvent::StorageFault(e));
                CommandReply::StorageFault(e)
            }
        }
    }

    fn store_failure(
        &mut self,
        err: StoreError,
        name: ColorName,
        sink: &mut impl EventSink,
    ) -> CommandReply {
        match err {
            StoreError::TableFull => CommandReply::TableFull,
            StoreError::NotFound => CommandReply::NotFound(name),
            StoreError::NameTooLong => CommandReply::NameTooLong,
            StoreError::Storage(e) => {
                sink.emit(&AppEvent::StorageFault(e));
                CommandReply::StorageFault(e)
            }
        }
    }
}
