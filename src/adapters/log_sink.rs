//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing engine events to the `log` facade
//! (the console on a debug build, nothing when no logger is installed).

use log::{info, warn};

use crate::app::events::FieldKitEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`FieldKitEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &FieldKitEvent) {
        match event {
            FieldKitEvent::CommandReceived(cmd) => {
                info!("CMD   | {}", cmd.as_str());
            }
            FieldKitEvent::ResponseSent { status, success } => {
                info!("RESP  | status={:?} success={}", status, success);
            }
            FieldKitEvent::SendFailed(status) => {
                warn!("RESP  | send failed, status={:?}", status);
            }
            FieldKitEvent::BufferOverflow { discarded } => {
                warn!("BUF   | overflow, {} bytes discarded", discarded);
            }
            FieldKitEvent::EnteringBootloader => {
                info!("BOOT  | jumping to bootloader");
            }
        }
    }
}
