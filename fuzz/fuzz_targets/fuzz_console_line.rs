//! Fuzz target: `LineEditor::feed` + `parse`
//!
//! Drives arbitrary serial byte streams through the line editor and
//! parses every completed line, asserting that nothing panics and that
//! accepted commands carry in-range values.
//!
//! cargo fuzz run fuzz_console_line

#![no_main]

use hsvlight::app::commands::AppCommand;
use hsvlight::console::{parse, LineEditor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut editor = LineEditor::new();

    for &b in data {
        let Some(line) = editor.feed(b) else { continue };
        assert!(line.len() <= 127, "line exceeds editor capacity");

        match parse(line) {
            Ok(AppCommand::SetRgb(d)) | Ok(AppCommand::AddRgbColor { drive: d, .. }) => {
                assert!(d.r <= 1000 && d.g <= 1000 && d.b <= 1000);
            }
            Ok(AppCommand::SetHsv(c)) | Ok(AppCommand::AddHsvColor { color: c, .. }) => {
                assert!(c.hue < 360 && c.saturation <= 100 && c.value <= 100);
            }
            _ => {}
        }
    }
});
