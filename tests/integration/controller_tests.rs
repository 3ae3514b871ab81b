//! Button → click detector → FSM → LEDs, driven through the AppService.

use crate::mock_hw::{blank_store, double_click, quiet_config, run, started};

use hsvlight::app::events::AppEvent;
use hsvlight::app::ports::LastColorStore;
use hsvlight::app::service::AppService;
use hsvlight::color::HsvColor;
use hsvlight::config::SystemConfig;
use hsvlight::fsm::InputMode;

#[test]
fn blank_storage_boots_default_color() {
    let (app, hw, sink) = started(quiet_config(), blank_store());

    // device 7205 → 5 % of the hue circle
    let expected = HsvColor::new(18, 100, 100);
    assert_eq!(app.color(), expected);
    assert_eq!(app.mode(), InputMode::NoInput);
    assert!(!app.restored());
    assert_eq!(hw.last_rgb(), Some(expected.to_drive()));
    assert_eq!(
        sink.events.first(),
        Some(&AppEvent::Started {
            mode: InputMode::NoInput,
            color: expected,
            restored: false,
        })
    );
}

#[test]
fn double_clicks_cycle_all_four_modes() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    let expected = [
        InputMode::Hue,
        InputMode::Saturation,
        InputMode::Brightness,
        InputMode::NoInput,
        InputMode::Hue,
    ];
    for (i, mode) in expected.into_iter().enumerate() {
        double_click(&mut app, &mut hw, &mut sink, 1000 + i as u32 * 1000);
        assert_eq!(app.mode(), mode, "after double click #{}", i + 1);
    }
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ModeChanged { .. })),
        expected.len()
    );
}

#[test]
fn single_click_changes_nothing() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    let before = app.color();

    app.on_button_edge(1000, &mut hw, &mut sink);
    app.tick(1399, &mut hw, &mut sink);
    assert_eq!(sink.count(|e| *e == AppEvent::SingleClick), 0);
    app.tick(1400, &mut hw, &mut sink);
    app.tick(1500, &mut hw, &mut sink);

    assert_eq!(sink.count(|e| *e == AppEvent::SingleClick), 1);
    assert_eq!(app.mode(), InputMode::NoInput);
    assert_eq!(app.color(), before);
}

#[test]
fn bounce_within_debounce_is_one_press() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());

    app.on_button_edge(1000, &mut hw, &mut sink);
    app.on_button_edge(1020, &mut hw, &mut sink);
    app.on_button_edge(1040, &mut hw, &mut sink);
    assert_eq!(app.mode(), InputMode::NoInput);

    app.on_button_edge(1100, &mut hw, &mut sink);
    assert_eq!(app.mode(), InputMode::Hue);
}

#[test]
fn slow_second_click_does_not_combine() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());

    app.on_button_edge(1000, &mut hw, &mut sink);
    app.on_button_edge(1400, &mut hw, &mut sink);
    assert_eq!(app.mode(), InputMode::NoInput);

    // The late edge opened a fresh window.
    app.on_button_edge(1500, &mut hw, &mut sink);
    assert_eq!(app.mode(), InputMode::Hue);
}

#[test]
fn holding_in_hue_mode_steps_hue() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    double_click(&mut app, &mut hw, &mut sink, 1000);
    assert_eq!(app.mode(), InputMode::Hue);

    hw.pressed = true;
    for t in (1110..=1400).step_by(10) {
        app.tick(t, &mut hw, &mut sink);
    }
    // Steps at 1150, 1200, ... 1400.
    assert_eq!(app.color(), HsvColor::new(24, 100, 100));
    assert_eq!(hw.last_rgb(), Some(HsvColor::new(24, 100, 100).to_drive()));

    hw.pressed = false;
    for t in (1410..=2000).step_by(10) {
        app.tick(t, &mut hw, &mut sink);
    }
    assert_eq!(app.color().hue, 24);
}

#[test]
fn saturation_wraps_at_full_scale() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    double_click(&mut app, &mut hw, &mut sink, 1000);
    double_click(&mut app, &mut hw, &mut sink, 2000);
    assert_eq!(app.mode(), InputMode::Saturation);

    hw.pressed = true;
    app.tick(2150, &mut hw, &mut sink);
    assert_eq!(app.color().saturation, 0);
    app.tick(2200, &mut hw, &mut sink);
    assert_eq!(app.color().saturation, 1);
}

#[test]
fn holding_in_no_input_edits_nothing() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    let before = app.color();
    hw.pressed = true;
    for t in (0..=1000).step_by(10) {
        app.tick(t, &mut hw, &mut sink);
    }
    assert_eq!(app.color(), before);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ColorChanged(_))), 0);
}

#[test]
fn indicator_follows_mode() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    run(&mut app, &mut hw, &mut sink, 0, 1100);
    assert_eq!(hw.indicator, 0);

    // Hue: slow blink, lit for the first second.
    double_click(&mut app, &mut hw, &mut sink, 1000);
    assert_eq!(hw.indicator, 1000);
    run(&mut app, &mut hw, &mut sink, 1110, 2100);
    assert_eq!(hw.indicator, 1000);
    run(&mut app, &mut hw, &mut sink, 2110, 2110);
    assert_eq!(hw.indicator, 0);

    // Brightness: solid.
    double_click(&mut app, &mut hw, &mut sink, 3000);
    double_click(&mut app, &mut hw, &mut sink, 4000);
    assert_eq!(app.mode(), InputMode::Brightness);
    run(&mut app, &mut hw, &mut sink, 4110, 4500);
    assert_eq!(hw.indicator, 1000);

    // Back to NoInput: dark.
    double_click(&mut app, &mut hw, &mut sink, 5000);
    run(&mut app, &mut hw, &mut sink, 5110, 5200);
    assert_eq!(hw.indicator, 0);
}

#[test]
fn boot_plays_identity_blink() {
    let (mut app, mut hw, mut sink) = started(SystemConfig::default(), blank_store());
    app.tick(0, &mut hw, &mut sink);
    assert_eq!(hw.indicator, 1000);
    app.tick(150, &mut hw, &mut sink);
    assert_eq!(hw.indicator, 1000);
    app.tick(151, &mut hw, &mut sink);
    assert_eq!(hw.indicator, 0);
}

#[test]
fn leaving_brightness_saves_once() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    for i in 0..4 {
        double_click(&mut app, &mut hw, &mut sink, 1000 + i * 1000);
    }
    assert_eq!(app.mode(), InputMode::NoInput);
    assert_eq!(app.store().last_color(), Some(app.color()));
    assert_eq!(app.store().page_writes(), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ColorSaved(_))), 1);

    // A second untouched cycle ends on the stored colour: no write.
    for i in 0..4 {
        double_click(&mut app, &mut hw, &mut sink, 10_000 + i * 1000);
    }
    assert_eq!(app.store().page_writes(), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ColorSaved(_))), 1);
}

#[test]
fn edit_cycle_persists_edited_color() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());

    double_click(&mut app, &mut hw, &mut sink, 1000);
    double_click(&mut app, &mut hw, &mut sink, 2000);
    double_click(&mut app, &mut hw, &mut sink, 3000);
    assert_eq!(app.mode(), InputMode::Brightness);

    hw.pressed = true;
    app.tick(3150, &mut hw, &mut sink);
    hw.pressed = false;
    let edited = app.color();
    assert_eq!(edited.value, 0);

    double_click(&mut app, &mut hw, &mut sink, 4000);
    assert_eq!(app.store().last_color(), Some(edited));
    assert!(sink.events.contains(&AppEvent::ColorSaved(edited)));
}

#[test]
fn storage_timeout_is_reported_not_fatal() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    app.store().flash().inject_busy(u32::MAX);

    for i in 0..4 {
        double_click(&mut app, &mut hw, &mut sink, 1000 + i * 1000);
    }

    assert_eq!(app.mode(), InputMode::NoInput);
    assert_eq!(app.store().last_color(), None);
    assert_eq!(app.store().page_writes(), 0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::StorageFault(_))),
        1
    );

    // The light keeps working.
    double_click(&mut app, &mut hw, &mut sink, 9000);
    assert_eq!(app.mode(), InputMode::Hue);
}

#[test]
fn timestamps_survive_u32_wrap() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    let t0 = u32::MAX - 50;
    app.on_button_edge(t0, &mut hw, &mut sink);
    app.on_button_edge(t0.wrapping_add(100), &mut hw, &mut sink);
    assert_eq!(app.mode(), InputMode::Hue);

    hw.pressed = true;
    app.tick(t0.wrapping_add(150), &mut hw, &mut sink);
    assert_eq!(app.color().hue, 19);
}

#[test]
fn restored_color_wins_over_default() {
    let mut store = blank_store();
    let saved = HsvColor::new(300, 40, 60);
    store.save_current(saved).unwrap();

    let app = AppService::new(quiet_config(), store);
    assert_eq!(app.color(), saved);
    assert!(app.restored());
}
