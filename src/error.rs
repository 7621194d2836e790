//! Unified error types for the Field Kit engine.
//!
//! Protocol-level failures (unknown commands, overflow, foreign traffic)
//! never surface here: they resolve into a response frame or a silent
//! buffer reset, and transport send failures are only logged.  This
//! module covers construction-time configuration problems.
//! All variants are `Copy` so they can be passed around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The injected [`DeviceConfig`](crate::config::DeviceConfig) is unusable.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Reasons a [`DeviceConfig`](crate::config::DeviceConfig) is rejected.
///
/// The `&'static str` names the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A required string field is empty.
    Empty(&'static str),
    /// A string field contains bytes outside printable ASCII.
    NotPrintable(&'static str),
    /// A string field contains `|` or `=`, which delimit info payloads.
    ReservedCharacter(&'static str),
    /// A string field does not fit its fixed-capacity storage.
    TooLong(&'static str),
    /// The bootloader delay exceeds the allowed bound.
    DelayOutOfRange,
    /// A `keyboard.json` manifest could not be parsed.
    Manifest,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(field) => write!(f, "{field} is empty"),
            Self::NotPrintable(field) => write!(f, "{field} is not printable ASCII"),
            Self::ReservedCharacter(field) => write!(f, "{field} contains '|' or '='"),
            Self::TooLong(field) => write!(f, "{field} is too long"),
            Self::DelayOutOfRange => write!(f, "bootloader delay out of range"),
            Self::Manifest => write!(f, "invalid keyboard manifest"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
