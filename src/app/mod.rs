//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the behaviour of the light: click decoding, the
//! four-mode input FSM, hold-to-edit stepping, the mode indicator and the
//! named-colour commands.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
