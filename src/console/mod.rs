//! Serial command interface.
//!
//! ```text
//!  bytes ──▶ LineEditor ──▶ parse() ──▶ AppService::handle_command
//!    │                                        │
//!    └──── echo ──────▶ out ◀── render_reply ─┘
//! ```

pub mod line;
pub mod parser;
pub mod session;

pub use line::LineEditor;
pub use parser::{parse, ParseError};
pub use session::ConsoleSession;
