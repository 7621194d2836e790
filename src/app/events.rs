//! Outbound engine events.
//!
//! The [`FieldKitEngine`](crate::rpc::engine::FieldKitEngine) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  None of them
//! reach the host; they exist for logs and diagnostics only.

use super::commands::Command;
use super::responses::ResponseStatus;

/// Structured events emitted while processing raw-HID reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKitEvent {
    /// A terminator completed a message and it was parsed.
    CommandReceived(Command),

    /// A response frame was handed to the transport.
    ResponseSent { status: ResponseStatus, success: bool },

    /// The transport refused the response frame.
    SendFailed(ResponseStatus),

    /// The message buffer filled without a terminator and was cleared.
    BufferOverflow { discarded: usize },

    /// The bootloader jump is about to happen.
    EnteringBootloader,
}
