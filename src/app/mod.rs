//! Application core: command vocabulary and responses, zero I/O.
//!
//! Everything the device says back to a host is decided here.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without a keyboard.

pub mod commands;
pub mod events;
pub mod ports;
pub mod responses;
pub mod service;
