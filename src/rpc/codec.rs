//! Terminator-delimited message accumulator and fixed-size response codec.
//!
//! Request wire format (after the magic pair is stripped):
//! ```text
//! ┌──────────────────────────────┬──────┐
//! │ ASCII command (N bytes)      │ 0x03 │
//! └──────────────────────────────┴──────┘
//! ```
//!
//! A command may arrive spread over any number of reports, so the
//! accumulator keeps its partial message between calls.  Responses are
//! always exactly [`RESPONSE_FRAME_SIZE`] bytes:
//! ```text
//! ┌────────────┬────────────────────────────────────┐
//! │ Status (1B)│ Message (≤ 30 B ASCII, zero-padded)│
//! └────────────┴────────────────────────────────────┘
//! ```

use crate::app::responses::{Response, ResponseStatus};

/// Message buffer capacity, including room for the implicit terminator.
pub const MSG_BUFFER_SIZE: usize = 256;

/// End-of-text byte closing every command.
pub const ETX: u8 = 0x03;

/// Size of every response report.
pub const RESPONSE_FRAME_SIZE: usize = 32;

/// Streaming message accumulator.
///
/// The fill level never exceeds `MSG_BUFFER_SIZE - 1`.
pub struct MessageAccumulator {
    buf: [u8; MSG_BUFFER_SIZE],
    len: usize,
    overflows: u32,
}

impl MessageAccumulator {
    pub const fn new() -> Self {
        Self {
            buf: [0; MSG_BUFFER_SIZE],
            len: 0,
            overflows: 0,
        }
    }

    /// Feed the payload of one protocol report.
    ///
    /// Returns `Some(&[u8])` when a terminator completes a message.  The
    /// message ends at the first NUL byte, if it contains one.  Bytes after
    /// the terminator in the same payload are not examined: at most one
    /// message completes per call.  The returned slice is valid until the
    /// next call to `accumulate`.
    ///
    /// When the buffer fills without a terminator, everything collected so
    /// far (and the byte that found it full) is dropped and scanning
    /// continues with an empty buffer.
    pub fn accumulate(&mut self, payload: &[u8]) -> Option<&[u8]> {
        for &byte in payload {
            if byte == ETX {
                let filled = self.len;
                self.len = 0;
                let end = self.buf[..filled]
                    .iter()
                    .position(|&b| b == 0)
                    .unwrap_or(filled);
                return Some(&self.buf[..end]);
            }

            if self.len < MSG_BUFFER_SIZE - 1 {
                self.buf[self.len] = byte;
                self.len += 1;
            } else {
                self.len = 0;
                self.overflows = self.overflows.wrapping_add(1);
            }
        }

        None // Message still in progress.
    }

    /// Bytes collected towards the in-progress message.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of times the buffer has been discarded for lack of a terminator.
    pub fn overflow_count(&self) -> u32 {
        self.overflows
    }

    /// Drop any partial message (e.g. after the host reconnects).
    pub fn reset(&mut self) {
        self.len = 0;
    }
}

impl Default for MessageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// One encoded response report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame([u8; RESPONSE_FRAME_SIZE]);

impl ResponseFrame {
    /// Encode `response` into a zero-padded frame.
    ///
    /// The message is copied only if it is non-empty and shorter than
    /// `RESPONSE_FRAME_SIZE - 1`; a longer message is left out entirely
    /// rather than cut off.
    pub fn encode(response: &Response) -> Self {
        let mut frame = [0u8; RESPONSE_FRAME_SIZE];
        frame[0] = response.status.as_u8();

        let msg = response.message.as_bytes();
        if !msg.is_empty() && msg.len() < RESPONSE_FRAME_SIZE - 1 {
            frame[1..=msg.len()].copy_from_slice(msg);
        }

        Self(frame)
    }

    /// Wrap a received report.  Short reports are zero-extended; `None`
    /// for an empty report.
    pub fn from_report(report: &[u8]) -> Option<Self> {
        if report.is_empty() {
            return None;
        }
        let mut frame = [0u8; RESPONSE_FRAME_SIZE];
        let n = report.len().min(RESPONSE_FRAME_SIZE);
        frame[..n].copy_from_slice(&report[..n]);
        Some(Self(frame))
    }

    pub fn as_bytes(&self) -> &[u8; RESPONSE_FRAME_SIZE] {
        &self.0
    }

    /// Decoded status byte (`None` for values outside the protocol).
    pub fn status(&self) -> Option<ResponseStatus> {
        ResponseStatus::from_u8(self.0[0])
    }

    /// Message text up to the zero padding; empty if it was omitted or is
    /// not valid UTF-8.
    pub fn message(&self) -> &str {
        let body = &self.0[1..];
        let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
        core::str::from_utf8(&body[..end]).unwrap_or("")
    }
}
