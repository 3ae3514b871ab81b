//! Interactive serial session.
//!
//! Glues the [`LineEditor`], the [`parse`] function and the
//! [`AppService`] together and renders every reply as text.  Output goes
//! to any [`core::fmt::Write`] so the same session drives the USB/UART
//! console on target and a `String` in tests.
//!
//! Every byte is echoed as received.  Each handled line is answered with
//! a `\r\n`-framed reply followed by the `"> "` prompt; a blank line gets
//! no answer.

use core::fmt::{self, Write};

use log::debug;

use super::line::LineEditor;
use super::parser::{parse, ParseError};
use crate::app::commands::CommandReply;
use crate::app::ports::{ColorTable, EventSink, IndicatorPort};
use crate::app::service::AppService;

pub const BANNER: &str = "\r\nHSV CLI Ready. Type 'help'.\r\n";
pub const PROMPT: &str = "> ";

const HELP: [(&str, &str); 9] = [
    ("RGB <red> <green> <blue>", "Set RGB color (0-1000)"),
    ("HSV <hue> <sat> <val>", "Set HSV color (0-360, 0-100, 0-100)"),
    ("add_rgb_color <r> <g> <b> <name>", "Store an RGB color"),
    ("add_hsv_color <h> <s> <v> <name>", "Store an HSV color"),
    ("add_current_color <name>", "Store the current color"),
    ("del_color <name>", "Delete a stored color"),
    ("apply_color <name>", "Show and keep a stored color"),
    ("list_colors", "List stored colors"),
    ("help", "Show this help"),
];

/// One console connection.
#[derive(Default)]
pub struct ConsoleSession {
    editor: LineEditor,
}

impl ConsoleSession {
    pub fn new() -> Self {
        Self {
            editor: LineEditor::new(),
        }
    }

    /// Port opened: drop any partial line and greet.
    pub fn open(&mut self, out: &mut impl Write) -> fmt::Result {
        self.editor.reset();
        out.write_str(BANNER)?;
        out.write_str(PROMPT)
    }

    /// Feed one received byte.
    pub fn on_byte<S: ColorTable>(
        &mut self,
        byte: u8,
        app: &mut AppService<S>,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
        out: &mut impl Write,
    ) -> fmt::Result {
        if byte.is_ascii() {
            out.write_char(char::from(byte))?;
        }
        let Some(line) = self.editor.feed(byte) else {
            return Ok(());
        };

        match parse(line) {
            Ok(cmd) => {
                debug!("console: {:?}", cmd);
                let reply = app.handle_command(cmd, hw, sink);
                render_reply(&reply, app.store(), out)?;
            }
            Err(ParseError::Empty) => return Ok(()),
            Err(e) => {
                debug!("console: rejected line ({})", e);
                render_error(e, out)?;
            }
        }
        out.write_str(PROMPT)
    }
}

/// Write the text for a handled command.
pub fn render_reply(
    reply: &CommandReply,
    table: &impl ColorTable,
    out: &mut impl Write,
) -> fmt::Result {
    match reply {
        CommandReply::RgbSet(drive) => write!(out, "\r\nColor set to {}\r\n", drive),
        CommandReply::HsvSet(color) => write!(out, "\r\nColor set to {}\r\n", color),
        CommandReply::Stored { name, slot } => {
            write!(out, "\r\nColor '{}' stored in slot {}\r\n", name, slot)
        }
        CommandReply::Deleted(name) => write!(out, "\r\nColor '{}' deleted\r\n", name),
        CommandReply::Applied { name, color } => {
            write!(out, "\r\nColor '{}' applied ({})\r\n", name, color)
        }
        CommandReply::Listing => {
            out.write_str("\r\n")?;
            let mut any = false;
            for (slot, name, color) in table.entries() {
                any = true;
                write!(out, "  {}: {} {}\r\n", slot, name, color)?;
            }
            if !any {
                out.write_str("No colors stored\r\n")?;
            }
            Ok(())
        }
        CommandReply::Help => {
            out.write_str("\r\nSupported commands:\r\n")?;
            for (usage, text) in HELP {
                write!(out, "  {:<28} {}\r\n", usage, text)?;
            }
            Ok(())
        }
        CommandReply::TableFull => out.write_str("\r\nColor table full\r\n"),
        CommandReply::NotFound(name) => write!(out, "\r\nColor '{}' not found\r\n", name),
        CommandReply::NameTooLong => out.write_str("\r\nColor name too long\r\n"),
        CommandReply::StorageFault(e) => write!(out, "\r\nStorage fault: {}\r\n", e),
    }
}

/// Write the text for a rejected line.
pub fn render_error(err: ParseError, out: &mut impl Write) -> fmt::Result {
    match err {
        ParseError::Empty => Ok(()),
        ParseError::UnknownCommand => out.write_str("\r\nUnknown command\r\n"),
        ParseError::InvalidRgb => out.write_str("\r\nUnknown command (Invalid RGB arguments)\r\n"),
        ParseError::InvalidHsv => out.write_str("\r\nUnknown command (Invalid HSV arguments)\r\n"),
        ParseError::MissingName => out.write_str("\r\nUnknown command (Missing color name)\r\n"),
        ParseError::NameTooLong => out.write_str("\r\nUnknown command (Color name too long)\r\n"),
    }
}
