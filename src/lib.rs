//! Field Kit firmware library.
//!
//! Recognises Field Kit requests on a shared raw-HID endpoint, assembles
//! them across reports, answers with fixed 32-byte frames and, on request,
//! hands the MCU to its bootloader.  All device interaction goes through
//! port traits so the whole engine runs on the host for testing.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod rpc;

pub use error::{Error, Result};
