//! Serial line editor.
//!
//! Accumulates console bytes into a fixed buffer and yields complete
//! lines.  Input arrives one byte per USB/UART read, so the editor keeps
//! no other state than the buffer itself.
//!
//! | Byte              | Effect                         |
//! |-------------------|--------------------------------|
//! | `\r` or `\n`      | complete the line              |
//! | 0x08, 0x7F        | drop the last buffered byte    |
//! | 0x20..=0x7E       | append (dropped when full)     |
//! | anything else     | ignored                        |

/// Usable line capacity in bytes.
pub const LINE_CAPACITY: usize = 127;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Streaming line editor.
pub struct LineEditor {
    buf: [u8; LINE_CAPACITY],
    len: usize,
}

impl LineEditor {
    pub const fn new() -> Self {
        Self {
            buf: [0; LINE_CAPACITY],
            len: 0,
        }
    }

    /// Feed one byte.
    ///
    /// Returns `Some(line)` when a terminator arrives.  The returned slice
    /// is valid until the next call to `feed`.
    pub fn feed(&mut self, byte: u8) -> Option<&str> {
        match byte {
            b'\r' | b'\n' => {
                let len = self.len;
                self.len = 0;
                // Only printable ASCII is ever buffered.
                core::str::from_utf8(&self.buf[..len]).ok()
            }
            BACKSPACE | DELETE => {
                self.len = self.len.saturating_sub(1);
                None
            }
            b' '..=b'~' => {
                if self.len < LINE_CAPACITY {
                    self.buf[self.len] = byte;
                    self.len += 1;
                }
                None
            }
            _ => None,
        }
    }

    /// Bytes buffered for the current line.
    pub fn pending(&self) -> usize {
        self.len
    }

    /// Discard the current line (e.g. when the port re-opens).
    pub fn reset(&mut self) {
        self.len = 0;
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}
