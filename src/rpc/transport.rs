//! Transport abstraction: the outgoing half of the raw-HID endpoint.
//!
//! Concrete implementations wrap the USB stack's report send call.  The
//! engine is generic over `Transport`, so a serial or simulated link
//! needs no changes to the protocol logic.

/// Report-oriented outgoing channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Queue one complete report for the host.
    fn send(&mut self, report: &[u8]) -> Result<(), Self::Error>;
}

/// A null transport that discards every report.
/// Useful as a default when no host is attached.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn send(&mut self, _report: &[u8]) -> Result<(), ()> {
        Ok(())
    }
}
