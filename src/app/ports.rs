//! Port traits: the boundary between the protocol core and the device.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FieldKitEngine (domain)
//! ```
//!
//! Driven adapters (bootloader jump, event sinks) implement these traits.
//! The engine consumes them via generics, so the protocol core never
//! touches hardware directly.  The outgoing report channel lives with the
//! rest of the wire stack in [`Transport`](crate::rpc::transport::Transport),
//! and the blocking wait uses [`embedded_hal::delay::DelayNs`].

use super::events::FieldKitEvent;

// ───────────────────────────────────────────────────────────────
// Bootloader port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Reset primitive that hands the MCU to its bootloader.
pub trait BootloaderPort {
    /// Jump to the bootloader.
    ///
    /// On hardware this never returns.  Simulation and test adapters
    /// record the call and return, after which the engine processes no
    /// further bytes from the report that triggered it.
    fn enter_bootloader(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The engine emits structured [`FieldKitEvent`]s through this port.
/// Adapters decide where they go (console log, counters, nowhere).
pub trait EventSink {
    fn emit(&mut self, event: &FieldKitEvent);
}

/// Sink that drops every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &FieldKitEvent) {}
}
