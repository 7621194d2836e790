//! Inbound Field Kit commands.
//!
//! A completed message is matched byte-for-byte against a fixed
//! vocabulary.  There is no case folding and no trimming: `"status"`
//! and `"STATUS "` are both [`Command::Unknown`].

/// Commands a host can send over the raw-HID channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Jump to the bootloader.
    Bootloader,
    /// Alias of [`Command::Bootloader`] kept for older host tools.
    RebootBootloader,
    /// Report product, bootloader, MCU and split transport.
    FirmwareInfo,
    /// Report which half of a split board this is.
    SideInfo,
    /// Liveness check.
    Status,
    /// Anything outside the vocabulary, including the empty string.
    Unknown,
}

impl Command {
    /// Exact, case-sensitive match against the command vocabulary.
    pub fn parse(text: &str) -> Self {
        match text {
            "BOOTLOADER" => Self::Bootloader,
            "REBOOT_BOOTLOADER" => Self::RebootBootloader,
            "FIRMWARE_INFO" => Self::FirmwareInfo,
            "SIDE_INFO" => Self::SideInfo,
            "STATUS" => Self::Status,
            _ => Self::Unknown,
        }
    }

    /// Parse raw message bytes; anything that is not UTF-8 is unknown.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        core::str::from_utf8(bytes).map_or(Self::Unknown, Self::parse)
    }

    /// Wire spelling of the command (`"?"` for [`Command::Unknown`]).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bootloader => "BOOTLOADER",
            Self::RebootBootloader => "REBOOT_BOOTLOADER",
            Self::FirmwareInfo => "FIRMWARE_INFO",
            Self::SideInfo => "SIDE_INFO",
            Self::Status => "STATUS",
            Self::Unknown => "?",
        }
    }

    /// Whether dispatching this command ends with a bootloader jump.
    pub const fn enters_bootloader(self) -> bool {
        matches!(self, Self::Bootloader | Self::RebootBootloader)
    }
}
