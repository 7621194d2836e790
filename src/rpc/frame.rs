//! Protocol recognition on a shared raw-HID endpoint.
//!
//! Other tools talk to the same endpoint, so every Field Kit report starts
//! with a fixed magic pair:
//! ```text
//! ┌──────┬──────┬──────────────────────┬──────┬─────────────┐
//! │ 0x82 │ 0x9E │ ASCII command        │ 0x03 │ zero padding│
//! └──────┴──────┴──────────────────────┴──────┴─────────────┘
//! ```
//! Reports without it belong to someone else and are left alone.

use super::codec::ETX;

pub const FIELD_KIT_ID1: u8 = 0x82;
pub const FIELD_KIT_ID2: u8 = 0x9E;

/// Magic pair prefixing every Field Kit request.
pub const MAGIC: [u8; 2] = [FIELD_KIT_ID1, FIELD_KIT_ID2];

/// Raw-HID report size used by host tools.
pub const REPORT_SIZE: usize = 32;

/// `true` iff `chunk` is at least two bytes long and starts with [`MAGIC`].
pub fn is_protocol_frame(chunk: &[u8]) -> bool {
    chunk.len() >= MAGIC.len() && chunk[0] == FIELD_KIT_ID1 && chunk[1] == FIELD_KIT_ID2
}

/// Bytes after the magic pair, or `None` for foreign traffic.
pub fn protocol_payload(chunk: &[u8]) -> Option<&[u8]> {
    if is_protocol_frame(chunk) {
        Some(&chunk[MAGIC.len()..])
    } else {
        None
    }
}

/// Build a request report for `command` into `out`.
///
/// Writes `[MAGIC][command][ETX]` and zero-fills the rest of `out`.
/// Returns the number of meaningful bytes, or `None` if the request does
/// not fit or the command itself contains the terminator.
pub fn encode_request(command: &str, out: &mut [u8]) -> Option<usize> {
    let cmd = command.as_bytes();
    let total = MAGIC.len() + cmd.len() + 1;
    if total > out.len() || cmd.contains(&ETX) {
        return None;
    }

    out[..MAGIC.len()].copy_from_slice(&MAGIC);
    out[MAGIC.len()..total - 1].copy_from_slice(cmd);
    out[total - 1] = ETX;
    out[total..].fill(0);

    Some(total)
}
