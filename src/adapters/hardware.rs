//! Host-side hardware adapter.
//!
//! Stands in for the MCU behind [`BootloaderPort`] and [`DelayNs`] when
//! the engine runs on a workstation (simulation, host tooling, tests).
//! The wait is a real thread sleep; the bootloader jump is recorded and
//! logged instead of resetting anything.  Firmware builds provide their
//! own adapter around the chip's reset primitive.

use std::time::Duration;

use embedded_hal::delay::DelayNs;
use log::info;

use crate::app::ports::BootloaderPort;

/// Simulated keyboard MCU.
#[derive(Debug, Default)]
pub struct SimulatedKeyboard {
    bootloader_requests: u32,
    in_bootloader: bool,
}

impl SimulatedKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the bootloader jump was requested.
    pub fn bootloader_requests(&self) -> u32 {
        self.bootloader_requests
    }

    /// Whether the simulated MCU has left the application.
    pub fn in_bootloader(&self) -> bool {
        self.in_bootloader
    }
}

impl DelayNs for SimulatedKeyboard {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

impl BootloaderPort for SimulatedKeyboard {
    fn enter_bootloader(&mut self) {
        self.bootloader_requests = self.bootloader_requests.saturating_add(1);
        self.in_bootloader = true;
        info!("Bootloader(sim): jump requested, no real reset");
    }
}
