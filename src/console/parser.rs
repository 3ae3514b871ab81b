//! Console command parser.
//!
//! Turns one completed line into an [`AppCommand`].  Command tokens are
//! case-insensitive; arguments are separated by ASCII whitespace.  For the
//! commands that take a name, the name is the remainder of the line and
//! may be wrapped in double quotes (which allows embedded spaces).
//!
//! Numbers are parsed strictly: `12x` is rejected rather than read as 12.

use core::fmt;

use crate::app::commands::{AppCommand, ColorName};
use crate::color::{DriveTriple, HsvColor, HUE_MAX, PERCENT_MAX, TOP_VALUE};

/// Reasons a line could not be turned into a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line.
    Empty,
    UnknownCommand,
    /// Missing or out-of-range drive values.
    InvalidRgb,
    /// Missing or out-of-range HSV values.
    InvalidHsv,
    MissingName,
    NameTooLong,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty line"),
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::InvalidRgb => write!(f, "invalid RGB arguments"),
            Self::InvalidHsv => write!(f, "invalid HSV arguments"),
            Self::MissingName => write!(f, "missing color name"),
            Self::NameTooLong => write!(f, "color name too long"),
        }
    }
}

/// Parse one line of console input.
pub fn parse(line: &str) -> Result<AppCommand, ParseError> {
    let (cmd, rest) = next_token(line);
    if cmd.is_empty() {
        return Err(ParseError::Empty);
    }

    if cmd.eq_ignore_ascii_case("help") {
        Ok(AppCommand::Help)
    } else if cmd.eq_ignore_ascii_case("rgb") {
        let (drive, _) = parse_drive(rest)?;
        Ok(AppCommand::SetRgb(drive))
    } else if cmd.eq_ignore_ascii_case("hsv") {
        let (color, _) = parse_hsv(rest)?;
        Ok(AppCommand::SetHsv(color))
    } else if cmd.eq_ignore_ascii_case("add_rgb_color") {
        let (drive, rest) = parse_drive(rest)?;
        Ok(AppCommand::AddRgbColor {
            drive,
            name: parse_name(rest)?,
        })
    } else if cmd.eq_ignore_ascii_case("add_hsv_color") {
        let (color, rest) = parse_hsv(rest)?;
        Ok(AppCommand::AddHsvColor {
            color,
            name: parse_name(rest)?,
        })
    } else if cmd.eq_ignore_ascii_case("add_current_color") {
        Ok(AppCommand::AddCurrentColor(parse_name(rest)?))
    } else if cmd.eq_ignore_ascii_case("del_color") {
        Ok(AppCommand::DeleteColor(parse_name(rest)?))
    } else if cmd.eq_ignore_ascii_case("apply_color") {
        Ok(AppCommand::ApplyColor(parse_name(rest)?))
    } else if cmd.eq_ignore_ascii_case("list_colors") {
        Ok(AppCommand::ListColors)
    } else {
        Err(ParseError::UnknownCommand)
    }
}

/// Split off the first whitespace-delimited token.
fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(|c: char| c.is_ascii_whitespace()) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}

/// Three bounded integers, or `None` if any is missing or out of range.
fn parse_triple(s: &str, max: [u16; 3]) -> Option<([u16; 3], &str)> {
    let mut out = [0u16; 3];
    let mut rest = s;
    for (slot, limit) in out.iter_mut().zip(max) {
        let (tok, tail) = next_token(rest);
        let value: u16 = tok.parse().ok()?;
        if value > limit {
            return None;
        }
        *slot = value;
        rest = tail;
    }
    Some((out, rest))
}

fn parse_drive(s: &str) -> Result<(DriveTriple, &str), ParseError> {
    let ([r, g, b], rest) =
        parse_triple(s, [TOP_VALUE; 3]).ok_or(ParseError::InvalidRgb)?;
    Ok((DriveTriple::new(r, g, b), rest))
}

fn parse_hsv(input: &str) -> Result<(HsvColor, &str), ParseError> {
    let pct = PERCENT_MAX as u16;
    let ([h, s, v], rest) =
        parse_triple(input, [HUE_MAX, pct, pct]).ok_or(ParseError::InvalidHsv)?;
    Ok((HsvColor::new(h, s as u8, v as u8), rest))
}

fn parse_name(s: &str) -> Result<ColorName, ParseError> {
    let mut name = s.trim();
    if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
        name = &name[1..name.len() - 1];
    }
    if name.is_empty() {
        return Err(ParseError::MissingName);
    }
    let mut out = ColorName::new();
    out.push_str(name).map_err(|()| ParseError::NameTooLong)?;
    Ok(out)
}
