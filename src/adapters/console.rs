//! Serial console adapter.
//!
//! A background reader thread pulls bytes from stdin (the USB-CDC/UART
//! console on target, the terminal on the host) and pushes each one into
//! the input event queue as [`InputEvent::ConsoleByte`].  Replies go back
//! through [`ConsoleOut`], a `core::fmt::Write` over stdout.
//!
//! ```text
//!  stdin ──▶ reader thread ──▶ INPUT_EVENTS ──▶ foreground loop
//!                                                   │
//!  stdout ◀────────────── ConsoleOut ◀──────────────┘
//! ```

use core::fmt;
use core::time::Duration;
use std::io::{ErrorKind, Read, Write};

use log::{info, warn};

use crate::events::{push_event, InputEvent};

const READER_STACK_BYTES: usize = 4096;
/// Back-off when the console has no data (non-blocking VFS on target).
const IDLE_POLL: Duration = Duration::from_millis(10);

/// Owns the reader thread.
pub struct ConsoleAdapter {
    _reader: std::thread::JoinHandle<()>,
}

impl ConsoleAdapter {
    /// Spawn the reader thread.
    pub fn start() -> std::io::Result<Self> {
        let reader = std::thread::Builder::new()
            .name("console-rx".into())
            .stack_size(READER_STACK_BYTES)
            .spawn(read_loop)?;
        info!("console: reader started");
        Ok(Self { _reader: reader })
    }
}

fn read_loop() {
    let mut stdin = std::io::stdin();
    let mut byte = [0u8; 1];
    loop {
        match stdin.read(&mut byte) {
            Ok(1) => {
                if !push_event(InputEvent::ConsoleByte(byte[0])) {
                    warn!("console: event queue full, byte dropped");
                }
            }
            // EOF on the host (stdin closed); keep the light running.
            Ok(_) => std::thread::sleep(IDLE_POLL),
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::Interrupted => {
                std::thread::sleep(IDLE_POLL);
            }
            Err(e) => {
                warn!("console: read failed ({}), reader stopped", e);
                return;
            }
        }
    }
}

/// Unbuffered writer for session output.
#[derive(Default)]
pub struct ConsoleOut;

impl ConsoleOut {
    pub fn new() -> Self {
        Self
    }
}

impl fmt::Write for ConsoleOut {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut out = std::io::stdout().lock();
        out.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        out.flush().map_err(|_| fmt::Error)
    }
}
