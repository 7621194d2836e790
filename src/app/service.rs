//! Command dispatcher: maps parsed commands onto responses.
//!
//! [`CommandDispatcher`] owns the injected [`DeviceConfig`] and nothing
//! else.  It is pure: the bootloader jump that follows a
//! [`Command::Bootloader`] is performed by the engine once the response
//! has reached the transport, never from here.
//!
//! ```text
//!  Command ──▶ ┌────────────────────┐ ──▶ (Response, success)
//!              │ CommandDispatcher  │
//!              │   DeviceConfig     │
//!              └────────────────────┘
//! ```

use core::fmt::Write as _;

use crate::config::DeviceConfig;

use super::commands::Command;
use super::responses::{Response, ResponseStatus};

pub const BOOTLOADER_MESSAGE: &str = "Entering bootloader mode";
pub const STATUS_MESSAGE: &str = "Field Kit active";
pub const UNKNOWN_MESSAGE: &str = "Unknown command";

pub struct CommandDispatcher {
    config: DeviceConfig,
}

impl CommandDispatcher {
    pub fn new(config: DeviceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Parse a completed message into a [`Command`].
    pub fn parse_command(message: &[u8]) -> Command {
        Command::from_bytes(message)
    }

    /// Build the response for `cmd`.
    ///
    /// The flag is `false` only for [`Command::Unknown`].  Bootloader
    /// commands report success even though execution ends shortly after.
    pub fn handle_command(&self, cmd: Command) -> (Response, bool) {
        match cmd {
            Command::Bootloader | Command::RebootBootloader => (
                Response::new(ResponseStatus::BootloaderTriggered, BOOTLOADER_MESSAGE),
                true,
            ),
            Command::FirmwareInfo => (self.firmware_info(), true),
            Command::SideInfo => (self.side_info(), true),
            Command::Status => (Response::new(ResponseStatus::Ok, STATUS_MESSAGE), true),
            Command::Unknown => (Response::new(ResponseStatus::Error, UNKNOWN_MESSAGE), false),
        }
    }

    /// `KEYBOARD=<name>|BOOTLOADER=<bootloader>|MCU=<mcu>|PROTOCOL=<transport>`
    pub fn firmware_info(&self) -> Response {
        let c = &self.config;
        let mut response = Response::new(ResponseStatus::Info, "");
        let written = write!(
            response.message,
            "KEYBOARD={}|BOOTLOADER={}|MCU={}|PROTOCOL={}",
            c.keyboard_name, c.bootloader, c.mcu, c.protocol
        );
        debug_assert!(written.is_ok(), "firmware info exceeds response capacity");
        response
    }

    /// `SIDE=<left|right>|SPLIT=<true|false>`
    pub fn side_info(&self) -> Response {
        let mut response = Response::new(ResponseStatus::Info, "");
        let written = write!(
            response.message,
            "SIDE={}|SPLIT={}",
            self.config.side, self.config.split
        );
        debug_assert!(written.is_ok(), "side info exceeds response capacity");
        response
    }
}
