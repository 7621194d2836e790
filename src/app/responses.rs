//! Outbound response records.
//!
//! A [`Response`] lives for exactly one dispatch: the
//! [`CommandDispatcher`](super::service::CommandDispatcher) builds it and
//! the response encoder turns it into a wire frame straight away.

use crate::rpc::codec::MSG_BUFFER_SIZE;

/// Capacity of a response message (one less than the message buffer).
pub const RESPONSE_MSG_CAP: usize = MSG_BUFFER_SIZE - 1;

/// Status byte carried in the first byte of every response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResponseStatus {
    Error = 0x00,
    Ok = 0x01,
    BootloaderTriggered = 0x02,
    Info = 0x03,
}

impl ResponseStatus {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0x00 => Some(Self::Error),
            0x01 => Some(Self::Ok),
            0x02 => Some(Self::BootloaderTriggered),
            0x03 => Some(Self::Info),
            _ => None,
        }
    }

    /// How a host interprets the status: everything but `Error` succeeded.
    pub const fn is_success(self) -> bool {
        !matches!(self, Self::Error)
    }
}

/// Status plus bounded text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: ResponseStatus,
    pub message: heapless::String<RESPONSE_MSG_CAP>,
}

impl Response {
    /// Build a response, clamping the message to [`RESPONSE_MSG_CAP`].
    pub fn new(status: ResponseStatus, message: &str) -> Self {
        let mut text = heapless::String::new();
        for ch in message.chars() {
            if text.push(ch).is_err() {
                break;
            }
        }
        Self {
            status,
            message: text,
        }
    }
}
