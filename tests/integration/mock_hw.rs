//! Mock hardware adapter for integration tests.
//!
//! Records every LED call so tests can assert on the full output history
//! without touching real GPIO/PWM registers.

use hsvlight::adapters::flash::FlashAdapter;
use hsvlight::app::commands::ColorName;
use hsvlight::app::events::AppEvent;
use hsvlight::app::ports::{ButtonPort, EventSink, IndicatorPort};
use hsvlight::app::service::AppService;
use hsvlight::color::DriveTriple;
use hsvlight::config::SystemConfig;
use hsvlight::storage::PersistenceStore;

pub type TestStore = PersistenceStore<FlashAdapter>;

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub rgb_writes: Vec<DriveTriple>,
    pub indicator: u16,
    /// Button level returned by the next `is_pressed` poll.
    pub pressed: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_rgb(&self) -> Option<DriveTriple> {
        self.rgb_writes.last().copied()
    }
}

impl IndicatorPort for MockHardware {
    fn set_rgb(&mut self, drive: DriveTriple) {
        self.rgb_writes.push(drive);
    }

    fn set_indicator(&mut self, intensity: u16) {
        self.indicator = intensity;
    }
}

impl ButtonPort for MockHardware {
    fn is_pressed(&mut self) -> bool {
        self.pressed
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// Config with the boot identity blink disabled so indicator output is
/// determined by the mode alone.
pub fn quiet_config() -> SystemConfig {
    SystemConfig {
        identity_blink_on_boot: false,
        ..SystemConfig::default()
    }
}

pub fn blank_store() -> TestStore {
    PersistenceStore::init(FlashAdapter::in_memory(4096, 4096), 0).unwrap()
}

/// Re-open the store on the same flash, as after a power cycle.
pub fn reboot(store: TestStore) -> TestStore {
    PersistenceStore::init(store.into_flash(), 0).unwrap()
}

pub fn started(
    config: SystemConfig,
    store: TestStore,
) -> (AppService<TestStore>, MockHardware, RecordingSink) {
    let mut app = AppService::new(config, store);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

/// Two edges 100 ms apart starting at `at_ms`.
pub fn double_click(
    app: &mut AppService<TestStore>,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    at_ms: u32,
) {
    app.on_button_edge(at_ms, hw, sink);
    app.on_button_edge(at_ms + 100, hw, sink);
}

pub fn name(s: &str) -> ColorName {
    let mut n = ColorName::new();
    n.push_str(s).unwrap();
    n
}

/// Foreground loop from `from_ms` to `to_ms` inclusive, one tick per 10 ms.
pub fn run(
    app: &mut AppService<TestStore>,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    from_ms: u32,
    to_ms: u32,
) {
    for t in (from_ms..=to_ms).step_by(10) {
        app.tick(t, hw, sink);
    }
}
