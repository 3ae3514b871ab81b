//! Console → AppService → PersistenceStore → flash, across simulated reboots.

use crate::mock_hw::{
    blank_store, name, quiet_config, reboot, started, MockHardware, RecordingSink, TestStore,
};

use hsvlight::app::commands::{AppCommand, CommandReply};
use hsvlight::app::events::AppEvent;
use hsvlight::app::ports::{ColorTable, LastColorStore, StorageError};
use hsvlight::app::service::AppService;
use hsvlight::color::{DriveTriple, HsvColor};
use hsvlight::console::ConsoleSession;
use hsvlight::storage::TABLE_SLOTS;

/// Type a line on the console and return everything written back.
fn type_line(
    session: &mut ConsoleSession,
    app: &mut AppService<TestStore>,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    line: &str,
) -> String {
    let mut out = String::new();
    for b in line.bytes().chain(Some(b'\r')) {
        session.on_byte(b, app, hw, sink, &mut out).unwrap();
    }
    out
}

#[test]
fn named_color_survives_restart() {
    let default = HsvColor::new(18, 100, 100);

    // First boot on blank flash.
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    let mut session = ConsoleSession::new();
    assert_eq!(app.store().last_color(), None);
    assert_eq!(app.color(), default);

    let out = type_line(&mut session, &mut app, &mut hw, &mut sink, "HSV 180 50 80");
    assert!(out.contains("Color set to H=180 S=50 V=80"));
    let out = type_line(&mut session, &mut app, &mut hw, &mut sink, "add_current_color mycolor");
    assert!(out.contains("Color 'mycolor' stored in slot 0"));

    // Restart: the console colour was never made "last", the table was.
    let (mut app, mut hw, mut sink) = started(quiet_config(), reboot(app.into_store()));
    let mut session = ConsoleSession::new();
    assert_eq!(app.color(), default);
    assert_eq!(app.store().get_color("mycolor"), Some(HsvColor::new(180, 50, 80)));

    let out = type_line(&mut session, &mut app, &mut hw, &mut sink, "apply_color mycolor");
    assert!(out.contains("Color 'mycolor' applied"));
    assert_eq!(app.color(), HsvColor::new(180, 50, 80));
    assert_eq!(hw.last_rgb(), Some(HsvColor::new(180, 50, 80).to_drive()));

    // apply_color also persisted it as the last colour.
    let app = AppService::new(quiet_config(), reboot(app.into_store()));
    assert!(app.restored());
    assert_eq!(app.color(), HsvColor::new(180, 50, 80));
}

#[test]
fn table_capacity_and_slot_reuse() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    let color = HsvColor::new(90, 50, 50);

    for i in 0..TABLE_SLOTS {
        let reply = app.handle_command(
            AppCommand::AddHsvColor {
                color,
                name: name(&format!("c{i}")),
            },
            &mut hw,
            &mut sink,
        );
        assert_eq!(
            reply,
            CommandReply::Stored {
                name: name(&format!("c{i}")),
                slot: i
            }
        );
    }

    let writes = app.store().page_writes();
    let reply = app.handle_command(
        AppCommand::AddCurrentColor(name("extra")),
        &mut hw,
        &mut sink,
    );
    assert_eq!(reply, CommandReply::TableFull);
    assert_eq!(app.store().page_writes(), writes, "nothing written when full");

    let reply = app.handle_command(AppCommand::DeleteColor(name("c3")), &mut hw, &mut sink);
    assert_eq!(reply, CommandReply::Deleted(name("c3")));

    let reply = app.handle_command(
        AppCommand::AddCurrentColor(name("extra")),
        &mut hw,
        &mut sink,
    );
    assert_eq!(
        reply,
        CommandReply::Stored {
            name: name("extra"),
            slot: 3
        }
    );
}

#[test]
fn re_adding_a_name_replaces_in_place() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());

    app.handle_command(
        AppCommand::AddRgbColor {
            drive: DriveTriple::new(1000, 0, 0),
            name: name("lamp"),
        },
        &mut hw,
        &mut sink,
    );
    let reply = app.handle_command(
        AppCommand::AddRgbColor {
            drive: DriveTriple::new(0, 0, 1000),
            name: name("lamp"),
        },
        &mut hw,
        &mut sink,
    );
    assert_eq!(
        reply,
        CommandReply::Stored {
            name: name("lamp"),
            slot: 0
        }
    );
    assert_eq!(app.store().get_color("lamp"), Some(HsvColor::new(240, 100, 100)));
    assert_eq!(app.store().entries().count(), 1);
}

#[test]
fn delete_reports_the_freed_slot() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    for n in ["a", "b"] {
        app.handle_command(AppCommand::AddCurrentColor(name(n)), &mut hw, &mut sink);
    }
    sink.events.clear();

    let reply = app.handle_command(AppCommand::DeleteColor(name("b")), &mut hw, &mut sink);
    assert_eq!(reply, CommandReply::Deleted(name("b")));
    assert_eq!(sink.events, vec![AppEvent::TableUpdated { slot: 1 }]);
}

#[test]
fn missing_names_are_reported() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    let before = app.color();

    let reply = app.handle_command(AppCommand::ApplyColor(name("ghost")), &mut hw, &mut sink);
    assert_eq!(reply, CommandReply::NotFound(name("ghost")));
    let reply = app.handle_command(AppCommand::DeleteColor(name("ghost")), &mut hw, &mut sink);
    assert_eq!(reply, CommandReply::NotFound(name("ghost")));

    assert_eq!(app.color(), before);
    assert_eq!(app.store().page_writes(), 0);
}

#[test]
fn busy_flash_fails_the_command_and_keeps_the_cache() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    app.store().flash().inject_busy(u32::MAX);

    let reply = app.handle_command(
        AppCommand::AddCurrentColor(name("late")),
        &mut hw,
        &mut sink,
    );
    assert_eq!(reply, CommandReply::StorageFault(StorageError::Timeout));
    assert!(sink
        .events
        .contains(&AppEvent::StorageFault(StorageError::Timeout)));
    assert_eq!(app.store().get_color("late"), None);
}

#[test]
fn console_errors_leave_state_untouched() {
    let (mut app, mut hw, mut sink) = started(quiet_config(), blank_store());
    let mut session = ConsoleSession::new();
    let before = app.color();
    let rgb_writes = hw.rgb_writes.len();

    for line in ["RGB 1 2", "HSV 400 0 0", "frobnicate", "apply_color"] {
        let out = type_line(&mut session, &mut app, &mut hw, &mut sink, line);
        assert!(out.contains("Unknown command"), "{line:?} -> {out:?}");
        assert!(out.ends_with("> "));
    }
    assert_eq!(app.color(), before);
    assert_eq!(hw.rgb_writes.len(), rgb_writes);
    assert_eq!(app.store().page_writes(), 0);
}
