//! Concrete mode handler functions and table builder.
//!
//! Each mode is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  NO_INPUT ──[double click]──▶ HUE ──[double click]──▶ SATURATION
//!     ▲                                                     │
//!     │                                              [double click]
//!     │                                                     ▼
//!     └──────────[double click, colour saved]───────── BRIGHTNESS
//! ```
//!
//! While an edit mode is active and the button is held, the bound field
//! steps by one every `value_change_interval_ms`, wrapping at its maximum.

use super::context::DeviceState;
use super::{InputMode, StateDescriptor};
use crate::color::HsvColor;
use crate::drivers::led_patterns::IndicatorPattern;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; InputMode::COUNT] {
    [
        // Index 0: NoInput
        StateDescriptor {
            id: InputMode::NoInput,
            name: "NoInput",
            on_enter: Some(no_input_enter),
            on_exit: None,
            on_update: no_input_update,
        },
        // Index 1: Hue
        StateDescriptor {
            id: InputMode::Hue,
            name: "Hue",
            on_enter: Some(hue_enter),
            on_exit: None,
            on_update: hue_update,
        },
        // Index 2: Saturation
        StateDescriptor {
            id: InputMode::Saturation,
            name: "Saturation",
            on_enter: Some(saturation_enter),
            on_exit: None,
            on_update: saturation_update,
        },
        // Index 3: Brightness
        StateDescriptor {
            id: InputMode::Brightness,
            name: "Brightness",
            on_enter: Some(brightness_enter),
            on_exit: Some(brightness_exit),
            on_update: brightness_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  NO_INPUT: colour shown, button edits nothing
// ═══════════════════════════════════════════════════════════════════════════

fn no_input_enter(ctx: &mut DeviceState) {
    ctx.indicator = IndicatorPattern::Off;
    info!("NO_INPUT: showing {}", ctx.color);
}

fn no_input_update(_ctx: &mut DeviceState) {}

// ═══════════════════════════════════════════════════════════════════════════
//  Edit modes
// ═══════════════════════════════════════════════════════════════════════════

/// Common entry for the three edit modes.  The hold timer restarts so a
/// button still held from the double click does not step immediately.
fn edit_enter(ctx: &mut DeviceState, pattern: IndicatorPattern) {
    ctx.indicator = pattern;
    ctx.last_value_change_ms = ctx.now_ms;
}

fn edit_step(ctx: &mut DeviceState, step: fn(&mut HsvColor)) {
    if !ctx.edit_step_due() {
        return;
    }
    let mut color = ctx.color;
    step(&mut color);
    ctx.set_color(color);
    ctx.last_value_change_ms = ctx.now_ms;
    debug!("edit: {}", ctx.color);
}

fn hue_enter(ctx: &mut DeviceState) {
    edit_enter(ctx, IndicatorPattern::SlowBlink);
    info!("HUE: hold to rotate hue (now {})", ctx.color.hue);
}

fn hue_update(ctx: &mut DeviceState) {
    edit_step(ctx, HsvColor::step_hue);
}

fn saturation_enter(ctx: &mut DeviceState) {
    edit_enter(ctx, IndicatorPattern::FastBlink);
    info!("SATURATION: hold to step saturation (now {})", ctx.color.saturation);
}

fn saturation_update(ctx: &mut DeviceState) {
    edit_step(ctx, HsvColor::step_saturation);
}

fn brightness_enter(ctx: &mut DeviceState) {
    edit_enter(ctx, IndicatorPattern::Solid);
    info!("BRIGHTNESS: hold to step value (now {})", ctx.color.value);
}

fn brightness_exit(ctx: &mut DeviceState) {
    // Leaving brightness always lands in NoInput: the edit cycle is done.
    ctx.save_pending = true;
}

fn brightness_update(ctx: &mut DeviceState) {
    edit_step(ctx, HsvColor::step_value);
}
