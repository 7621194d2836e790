//! Field Kit engine: turns raw-HID reports into responses.
//!
//! **Transport-decoupled**: the engine does not own a transport.  The
//! receive callback feeds each report via [`FieldKitEngine::process_report`]
//! together with the ports it may need, and the engine writes at most one
//! response frame back.
//!
//! Every report passes through a four-stage pipeline:
//!
//! 1. **Recognition**: reports without the magic pair are ignored.
//! 2. **Accumulation**: payload bytes are buffered until a terminator.
//! 3. **Dispatch**: the completed message is parsed and answered.
//! 4. **Encoding**: the response is packed into a 32-byte frame and sent.
//!
//! Stages 1-3 and the frame encoding touch engine state but do no I/O
//! ([`FieldKitEngine::receive`]).  Sending is a separate step
//! ([`PendingResponse::complete`]), so a lock around the engine never
//! has to span the transport or the bootloader delay.
//!
//! Bootloader commands finish with a bounded wait followed by the jump,
//! strictly after the response frame was handed to the transport.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::app::commands::Command;
use crate::app::events::FieldKitEvent;
use crate::app::ports::{BootloaderPort, EventSink};
use crate::app::responses::Response;
use crate::app::service::CommandDispatcher;
use crate::config::DeviceConfig;
use crate::error::Result;

use super::codec::{MSG_BUFFER_SIZE, MessageAccumulator, ResponseFrame};
use super::frame::protocol_payload;
use super::transport::Transport;

/// Outcome of a report that completed a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    pub command: Command,
    pub frame: ResponseFrame,
    pub success: bool,
}

/// One Field Kit session: a message buffer plus the device identity.
///
/// Use one engine per connection.  Calls must be serialized; the engine
/// itself holds no locks (see [`SharedEngine`](super::shared::SharedEngine)
/// for callback-driven use).
pub struct FieldKitEngine {
    accumulator: MessageAccumulator,
    dispatcher: CommandDispatcher,
}

impl FieldKitEngine {
    /// Validate `config` and build an engine with an empty buffer.
    pub fn new(config: DeviceConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Field Kit: ready ({}, side={}, split={})",
            config.keyboard_name, config.side, config.split
        );
        Ok(Self {
            accumulator: MessageAccumulator::new(),
            dispatcher: CommandDispatcher::new(config),
        })
    }

    pub fn config(&self) -> &DeviceConfig {
        self.dispatcher.config()
    }

    /// Bytes buffered towards the in-progress command.
    pub fn buffered_len(&self) -> usize {
        self.accumulator.len()
    }

    /// Drop any partial command (e.g. on USB suspend or reconnect).
    pub fn reset(&mut self) {
        self.accumulator.reset();
    }

    /// Process one report delivered by the transport.
    ///
    /// Returns `None` for foreign reports and for reports that did not
    /// complete a command.  When a command completes, its response is sent
    /// through `transport` before this returns; for bootloader commands
    /// `hw` then waits the configured delay and jumps.
    pub fn process_report(
        &mut self,
        report: &[u8],
        transport: &mut impl Transport,
        hw: &mut (impl BootloaderPort + DelayNs),
        sink: &mut impl EventSink,
    ) -> Option<Dispatched> {
        let pending = self.receive(report, sink)?;
        Some(pending.complete(transport, hw, sink))
    }

    /// Recognise, accumulate, dispatch and encode, without any I/O.
    ///
    /// Returns the response still to be sent when the report completed a
    /// command.  Only this step touches engine state, so callers that
    /// guard the engine with a lock can release it before
    /// [`PendingResponse::complete`].
    pub fn receive(
        &mut self,
        report: &[u8],
        sink: &mut impl EventSink,
    ) -> Option<PendingResponse> {
        let payload = protocol_payload(report)?;

        let overflows_before = self.accumulator.overflow_count();
        let command = self.accumulator.accumulate(payload).map(|message| {
            debug!(
                "Field Kit: message {:?}",
                core::str::from_utf8(message).unwrap_or("<non-ascii>")
            );
            CommandDispatcher::parse_command(message)
        });

        let overflows = self.accumulator.overflow_count().wrapping_sub(overflows_before);
        if overflows > 0 {
            warn!("Field Kit: buffer overflow, resetting");
            sink.emit(&FieldKitEvent::BufferOverflow {
                discarded: overflows as usize * MSG_BUFFER_SIZE,
            });
        }

        let command = command?;
        info!("Field Kit: received command {}", command.as_str());
        sink.emit(&FieldKitEvent::CommandReceived(command));

        let (response, success) = self.dispatcher.handle_command(command);
        let frame = ResponseFrame::encode(&response);

        Some(PendingResponse {
            command,
            response,
            frame,
            success,
            bootloader_delay_ms: self.config().bootloader_delay_ms,
        })
    }
}

/// A dispatched command whose frame has not been sent yet.
#[must_use = "the response is only sent by `complete`"]
#[derive(Debug, Clone)]
pub struct PendingResponse {
    command: Command,
    response: Response,
    frame: ResponseFrame,
    success: bool,
    bootloader_delay_ms: u32,
}

impl PendingResponse {
    pub fn command(&self) -> Command {
        self.command
    }

    pub fn frame(&self) -> &ResponseFrame {
        &self.frame
    }

    /// Send the frame, then for bootloader commands wait and jump.
    ///
    /// A failed send is logged and reported to `sink`; the jump still
    /// happens.
    pub fn complete(
        self,
        transport: &mut impl Transport,
        hw: &mut (impl BootloaderPort + DelayNs),
        sink: &mut impl EventSink,
    ) -> Dispatched {
        let Self {
            command,
            response,
            frame,
            success,
            bootloader_delay_ms,
        } = self;

        match transport.send(frame.as_bytes()) {
            Ok(()) => {
                info!(
                    "Field Kit: sent response status={:?} msg={}",
                    response.status, response.message
                );
                sink.emit(&FieldKitEvent::ResponseSent {
                    status: response.status,
                    success,
                });
            }
            Err(e) => {
                warn!("Field Kit: response send failed: {:?}", e);
                sink.emit(&FieldKitEvent::SendFailed(response.status));
            }
        }

        if command.enters_bootloader() {
            info!("Field Kit: triggering bootloader mode");
            sink.emit(&FieldKitEvent::EnteringBootloader);
            hw.delay_ms(bootloader_delay_ms);
            hw.enter_bootloader();
        }

        Dispatched {
            command,
            frame,
            success,
        }
    }
}
