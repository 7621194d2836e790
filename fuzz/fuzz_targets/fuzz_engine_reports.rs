//! Fuzz target: `FieldKitEngine::process_report`
//!
//! Splits the input into 32-byte reports and feeds them through a full
//! engine.  Every response must be exactly one frame long, and a jump may
//! only follow a bootloader command.
//!
//! cargo fuzz run fuzz_engine_reports

#![no_main]

use embedded_hal::delay::DelayNs;
use fieldkit::app::ports::{BootloaderPort, NullSink};
use fieldkit::config::DeviceConfig;
use fieldkit::rpc::codec::RESPONSE_FRAME_SIZE;
use fieldkit::rpc::engine::FieldKitEngine;
use fieldkit::rpc::frame::REPORT_SIZE;
use fieldkit::rpc::transport::Transport;
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Sim {
    sends: usize,
    jumps: usize,
}

impl Transport for Sim {
    type Error = ();
    fn send(&mut self, report: &[u8]) -> Result<(), ()> {
        assert_eq!(report.len(), RESPONSE_FRAME_SIZE);
        self.sends += 1;
        Ok(())
    }
}

impl DelayNs for Sim {
    fn delay_ns(&mut self, _ns: u32) {}
}

impl BootloaderPort for Sim {
    fn enter_bootloader(&mut self) {
        self.jumps += 1;
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut engine) = FieldKitEngine::new(DeviceConfig::default()) else {
        return;
    };
    let mut tx = Sim::default();
    let mut hw = Sim::default();

    for report in data.chunks(REPORT_SIZE) {
        let sends_before = tx.sends;
        let jumps_before = hw.jumps;
        match engine.process_report(report, &mut tx, &mut hw, &mut NullSink) {
            Some(out) => {
                assert_eq!(tx.sends, sends_before + 1);
                let jumped = hw.jumps - jumps_before;
                assert_eq!(jumped, usize::from(out.command.enters_bootloader()));
            }
            None => assert_eq!(tx.sends, sends_before),
        }
    }
});
