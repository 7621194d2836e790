//! Engine cell for interrupt / USB-callback delivery.
//!
//! The raw-HID receive hook is a free function with no context pointer,
//! so the firmware keeps its engine in a `static`.  [`SharedEngine`] is a
//! critical-section guarded cell built on `embassy-sync`, so the static
//! needs no `unsafe` and no heap.
//!
//! ```text
//! ┌──────────────────┐ report ┌──────────────┐ frame ┌───────────┐
//! │ raw_hid_receive  │───────▶│ SharedEngine │──────▶│ Transport │
//! │ (USB callback)   │        │ (CS mutex)   │       │ (send)    │
//! └──────────────────┘        └──────────────┘       └───────────┘
//! ```
//!
//! A report delivered while another one is still being processed (e.g.
//! from inside a transport send) is dropped with a warning instead of
//! corrupting the message buffer or interleaving responses.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::delay::DelayNs;
use log::warn;

use crate::app::ports::{BootloaderPort, EventSink};

use super::engine::{Dispatched, FieldKitEngine};
use super::transport::Transport;

struct Slot {
    engine: Option<FieldKitEngine>,
    /// Set from the start of a dispatch until its response is sent.
    busy: bool,
}

type SlotCell = Mutex<CriticalSectionRawMutex, RefCell<Slot>>;

/// Statically constructible home for one [`FieldKitEngine`].
///
/// The critical section is held only while the report is accumulated and
/// answered in memory.  Sending, the bootloader delay and the jump run
/// with interrupts enabled.
pub struct SharedEngine {
    inner: SlotCell,
}

impl SharedEngine {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Slot {
                engine: None,
                busy: false,
            })),
        }
    }

    /// Install (or replace) the engine.  Returns `false` if called while
    /// a report is being processed.
    pub fn install(&self, engine: FieldKitEngine) -> bool {
        self.inner.lock(|cell| match cell.try_borrow_mut() {
            Ok(mut slot) if !slot.busy => {
                slot.engine = Some(engine);
                true
            }
            _ => {
                warn!("Field Kit: engine busy, install refused");
                false
            }
        })
    }

    pub fn is_installed(&self) -> bool {
        self.inner.lock(|cell| match cell.try_borrow() {
            Ok(slot) => slot.engine.is_some(),
            // Borrowed mutably means a dispatch is using the engine.
            Err(_) => true,
        })
    }

    /// Forward a report to the installed engine.
    ///
    /// Returns `None` if no engine is installed, if the call is reentrant,
    /// or if the report did not complete a command.
    pub fn process_report(
        &self,
        report: &[u8],
        transport: &mut impl Transport,
        hw: &mut (impl BootloaderPort + DelayNs),
        sink: &mut impl EventSink,
    ) -> Option<Dispatched> {
        let pending = self.inner.lock(|cell| {
            let mut slot = match cell.try_borrow_mut() {
                Ok(slot) if !slot.busy => slot,
                _ => {
                    warn!("Field Kit: reentrant report dropped");
                    return None;
                }
            };
            let pending = slot.engine.as_mut()?.receive(report, sink)?;
            slot.busy = true;
            Some(pending)
        })?;

        let _busy = BusyGuard(&self.inner);
        Some(pending.complete(transport, hw, sink))
    }

    /// Run `f` against the installed engine (e.g. to reset it).
    ///
    /// Returns `None` if no engine is installed or a dispatch is in flight.
    pub fn with<R>(&self, f: impl FnOnce(&mut FieldKitEngine) -> R) -> Option<R> {
        self.inner.lock(|cell| {
            let mut slot = cell.try_borrow_mut().ok()?;
            if slot.busy {
                return None;
            }
            slot.engine.as_mut().map(f)
        })
    }
}

impl Default for SharedEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the busy flag when the unlocked phase ends, even on unwind.
struct BusyGuard<'a>(&'a SlotCell);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.lock(|cell| {
            if let Ok(mut slot) = cell.try_borrow_mut() {
                slot.busy = false;
            }
        });
    }
}
