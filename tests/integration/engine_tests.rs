//! Integration tests for the report → engine → transport pipeline.
//!
//! These run on the host and drive [`FieldKitEngine`] exactly the way the
//! raw-HID receive callback does, asserting on what reaches the transport
//! and the bootloader port.

use fieldkit::app::commands::Command;
use fieldkit::app::events::FieldKitEvent;
use fieldkit::app::responses::ResponseStatus;
use fieldkit::config::{DeviceConfig, Side};
use fieldkit::rpc::codec::{MSG_BUFFER_SIZE, RESPONSE_FRAME_SIZE, ResponseFrame};
use fieldkit::rpc::engine::{Dispatched, FieldKitEngine};

use crate::mock_hw::{
    HwCall, Journal, MockHardware, MockTransport, RecordingSink, journal, request, sent,
};

struct Rig {
    engine: FieldKitEngine,
    journal: Journal,
    tx: MockTransport,
    hw: MockHardware,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        Self::with_config(DeviceConfig::default())
    }

    fn with_config(config: DeviceConfig) -> Self {
        let journal = journal();
        Self {
            engine: FieldKitEngine::new(config).unwrap(),
            tx: MockTransport::new(&journal),
            hw: MockHardware::new(&journal),
            sink: RecordingSink::new(),
            journal,
        }
    }

    fn feed(&mut self, report: &[u8]) -> Option<Dispatched> {
        self.engine
            .process_report(report, &mut self.tx, &mut self.hw, &mut self.sink)
    }

    /// Total time spent in `DelayNs`, however the wait was split up.
    fn waited_ns(&self) -> u64 {
        self.journal
            .borrow()
            .iter()
            .filter_map(|c| match c {
                HwCall::Delay { ns } => Some(u64::from(*ns)),
                _ => None,
            })
            .sum()
    }

    fn jumps(&self) -> usize {
        self.journal
            .borrow()
            .iter()
            .filter(|c| **c == HwCall::EnterBootloader)
            .count()
    }
}

fn with_magic(body: &[u8]) -> Vec<u8> {
    let mut report = vec![0x82, 0x9E];
    report.extend_from_slice(body);
    report
}

// ── Foreign traffic ───────────────────────────────────────────

#[test]
fn foreign_reports_leave_state_untouched() {
    let mut rig = Rig::new();
    assert!(rig.feed(&with_magic(b"STA")).is_none());
    assert_eq!(rig.engine.buffered_len(), 3);

    for report in [
        &[][..],
        &[0x82][..],
        &[0x9E, 0x82, b'T', b'U', b'S', 0x03][..],
        &[0x00, 0x00, b'T', b'U', b'S', 0x03][..],
        &b"TUS\x03"[..],
    ] {
        assert!(rig.feed(report).is_none());
        assert_eq!(rig.engine.buffered_len(), 3);
    }

    assert!(rig.journal.borrow().is_empty(), "nothing may be sent");
    assert!(rig.sink.events.is_empty());

    // The buffered "STA" is intact: finishing it dispatches STATUS.
    let out = rig.feed(&with_magic(b"TUS\x03")).unwrap();
    assert_eq!(out.command, Command::Status);
    assert_eq!(out.frame.message(), "Field Kit active");
}

// ── Fragmentation ─────────────────────────────────────────────

#[test]
fn split_command_matches_single_report() {
    let mut whole = Rig::new();
    let expected = whole.feed(&request("FIRMWARE_INFO")).unwrap();

    let mut split = Rig::new();
    assert!(split.feed(&with_magic(b"FIRMWA")).is_none());
    assert!(sent(&split.journal).is_empty());
    let got = split.feed(&with_magic(b"RE_INFO\x03")).unwrap();

    assert_eq!(got, expected);
    assert_eq!(sent(&split.journal), sent(&whole.journal));
    assert_eq!(sent(&split.journal).len(), 1, "exactly one dispatch");
}

#[test]
fn command_can_arrive_one_byte_per_report() {
    let mut rig = Rig::new();
    for &b in b"SIDE_INFO" {
        assert!(rig.feed(&with_magic(&[b])).is_none());
    }
    let out = rig.feed(&with_magic(b"\x03")).unwrap();
    assert_eq!(out.command, Command::SideInfo);
}

#[test]
fn zero_padding_inside_a_partial_report_cuts_the_command() {
    // A padded fragment leaves NULs in the buffer; the message ends there.
    let mut rig = Rig::new();
    let mut fragment = [0u8; 32];
    fragment[..5].copy_from_slice(b"\x82\x9eSTA");
    assert!(rig.feed(&fragment).is_none());
    let out = rig.feed(&with_magic(b"TUS\x03")).unwrap();
    assert_eq!(out.command, Command::Unknown);
}

#[test]
fn only_first_command_in_a_report_is_dispatched() {
    let mut rig = Rig::new();
    let out = rig.feed(&with_magic(b"STATUS\x03SIDE_INFO\x03")).unwrap();
    assert_eq!(out.command, Command::Status);
    assert_eq!(sent(&rig.journal).len(), 1);
    assert_eq!(rig.engine.buffered_len(), 0);
}

// ── Overflow ──────────────────────────────────────────────────

#[test]
fn overflow_resets_and_next_command_parses() {
    let mut rig = Rig::new();
    // Eight reports of 32 filler bytes: the last byte finds the buffer full.
    for _ in 0..(MSG_BUFFER_SIZE / 32) {
        assert!(rig.feed(&with_magic(&[b'A'; 32])).is_none());
    }
    assert_eq!(rig.engine.buffered_len(), 0);
    assert!(sent(&rig.journal).is_empty(), "overflow is never answered");
    assert_eq!(
        rig.sink.events,
        vec![FieldKitEvent::BufferOverflow {
            discarded: MSG_BUFFER_SIZE
        }]
    );

    let out = rig.feed(&request("STATUS")).unwrap();
    assert_eq!(out.command, Command::Status);
    assert_eq!(out.frame.message(), "Field Kit active");
}

#[test]
fn bytes_after_overflow_start_a_new_message() {
    let mut rig = Rig::new();
    let mut body = vec![b'A'; MSG_BUFFER_SIZE];
    body.extend_from_slice(b"STATUS\x03");
    let out = rig.feed(&with_magic(&body)).unwrap();
    assert_eq!(out.command, Command::Status);
}

#[test]
fn overflow_remainder_prefixes_next_command() {
    let mut rig = Rig::new();
    assert!(rig.feed(&with_magic(&[b'A'; MSG_BUFFER_SIZE + 4])).is_none());
    assert_eq!(rig.engine.buffered_len(), 4);
    let out = rig.feed(&request("STATUS")).unwrap();
    assert_eq!(out.command, Command::Unknown);
}

#[test]
fn buffer_never_exceeds_capacity() {
    let mut rig = Rig::new();
    for _ in 0..100 {
        rig.feed(&with_magic(&[b'Q'; 29]));
        assert!(rig.engine.buffered_len() < MSG_BUFFER_SIZE);
    }
}

// ── Command vocabulary ────────────────────────────────────────

#[test]
fn matching_is_case_sensitive() {
    let mut rig = Rig::new();
    let lower = rig.feed(&request("status")).unwrap();
    assert_eq!(lower.command, Command::Unknown);
    assert!(!lower.success);
    assert_eq!(lower.frame.status(), Some(ResponseStatus::Error));
    assert_eq!(lower.frame.message(), "Unknown command");

    let upper = rig.feed(&request("STATUS")).unwrap();
    assert!(upper.success);
    assert_eq!(upper.frame.status(), Some(ResponseStatus::Ok));
    assert_eq!(upper.frame.message(), "Field Kit active");
}

#[test]
fn empty_command_is_unknown() {
    let mut rig = Rig::new();
    let out = rig.feed(&with_magic(b"\x03")).unwrap();
    assert_eq!(out.command, Command::Unknown);
    assert_eq!(out.frame.as_bytes()[0], 0x00);
}

#[test]
fn side_info_frame_carries_payload() {
    let mut config = DeviceConfig::default();
    config.side = Side::Left;
    let mut rig = Rig::with_config(config);
    let out = rig.feed(&request("SIDE_INFO")).unwrap();
    assert_eq!(out.frame.status(), Some(ResponseStatus::Info));
    assert_eq!(out.frame.message(), "SIDE=left|SPLIT=true");
}

#[test]
fn firmware_info_too_long_for_frame_is_sent_without_text() {
    let mut rig = Rig::new();
    let out = rig.feed(&request("FIRMWARE_INFO")).unwrap();
    assert!(out.success);

    let reports = sent(&rig.journal);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].len(), RESPONSE_FRAME_SIZE);
    assert_eq!(reports[0][0], ResponseStatus::Info.as_u8());
    assert!(reports[0][1..].iter().all(|&b| b == 0));
}

// ── Bootloader ────────────────────────────────────────────────

#[test]
fn bootloader_commands_respond_then_wait_then_jump() {
    for cmd in ["BOOTLOADER", "REBOOT_BOOTLOADER"] {
        let mut rig = Rig::new();
        let out = rig.feed(&request(cmd)).unwrap();
        assert!(out.success);
        assert_eq!(out.frame.status(), Some(ResponseStatus::BootloaderTriggered));
        assert_eq!(out.frame.message(), "Entering bootloader mode");

        let calls = rig.journal.borrow().clone();
        assert!(matches!(calls.first(), Some(HwCall::Send(_))), "{cmd}: response first");
        assert_eq!(calls.last(), Some(&HwCall::EnterBootloader), "{cmd}: jump last");
        assert_eq!(rig.waited_ns(), 100_000_000, "{cmd}: 100 ms before the jump");
        assert_eq!(rig.jumps(), 1);
    }
}

#[test]
fn bootloader_still_jumps_when_send_fails() {
    let mut rig = Rig::new();
    rig.tx.fail = true;
    let out = rig.feed(&request("BOOTLOADER")).unwrap();
    assert!(out.success);
    assert_eq!(rig.jumps(), 1);
    let failed = FieldKitEvent::SendFailed(ResponseStatus::BootloaderTriggered);
    assert!(rig.sink.events.contains(&failed));
}

#[test]
fn configured_delay_is_honoured() {
    let mut config = DeviceConfig::default();
    config.bootloader_delay_ms = 250;
    let mut rig = Rig::with_config(config);
    rig.feed(&request("BOOTLOADER"));
    assert_eq!(rig.waited_ns(), 250_000_000);
}

#[test]
fn non_bootloader_commands_never_jump() {
    let mut rig = Rig::new();
    for cmd in ["STATUS", "FIRMWARE_INFO", "SIDE_INFO", "NOPE"] {
        rig.feed(&request(cmd)).unwrap();
    }
    assert_eq!(rig.jumps(), 0);
    assert_eq!(rig.waited_ns(), 0);
    assert_eq!(sent(&rig.journal).len(), 4);
}

// ── Idempotence ───────────────────────────────────────────────

#[test]
fn repeated_status_is_identical() {
    let mut rig = Rig::new();
    let first = rig.feed(&request("STATUS")).unwrap();
    for _ in 0..10 {
        let next = rig.feed(&request("STATUS")).unwrap();
        assert_eq!(next.frame, first.frame);
        assert_eq!(rig.engine.buffered_len(), 0);
    }
    let reports = sent(&rig.journal);
    assert_eq!(reports.len(), 11);
    assert!(reports.iter().all(|r| r == &reports[0]));
}

#[test]
fn events_trace_a_dispatch() {
    let mut rig = Rig::new();
    rig.feed(&request("STATUS"));
    assert_eq!(
        rig.sink.events,
        vec![
            FieldKitEvent::CommandReceived(Command::Status),
            FieldKitEvent::ResponseSent {
                status: ResponseStatus::Ok,
                success: true
            },
        ]
    );
}

#[test]
fn decoded_frame_matches_wire_bytes() {
    let mut rig = Rig::new();
    rig.feed(&request("SIDE_INFO"));
    let reports = sent(&rig.journal);
    let frame = ResponseFrame::from_report(&reports[0]).unwrap();
    assert_eq!(frame.status(), Some(ResponseStatus::Info));
    assert!(frame.status().unwrap().is_success());
    assert_eq!(frame.message(), "SIDE=right|SPLIT=true");
}

#[test]
fn firmware_info_record_has_documented_format() {
    use fieldkit::app::service::CommandDispatcher;

    let config = DeviceConfig::from_keyboard_json(
        r#"{ "keyboard_name": "corne", "bootloader": "rp2040",
             "split": { "enabled": true, "transport": { "protocol": "serial" } } }"#,
        Side::Left,
    )
    .unwrap();
    let dispatcher = CommandDispatcher::new(config);

    let (info, ok) = dispatcher.handle_command(Command::FirmwareInfo);
    assert!(ok);
    assert_eq!(info.status, ResponseStatus::Info);
    assert_eq!(
        info.message.as_str(),
        "KEYBOARD=corne|BOOTLOADER=rp2040|MCU=rp2040|PROTOCOL=serial"
    );

    let (side, ok) = dispatcher.handle_command(Command::SideInfo);
    assert!(ok);
    assert_eq!(side.status, ResponseStatus::Info);
    assert_eq!(side.message.as_str(), "SIDE=left|SPLIT=true");
}

// ── Host adapters ─────────────────────────────────────────────

#[test]
fn simulated_keyboard_with_log_sink() {
    use fieldkit::adapters::hardware::SimulatedKeyboard;
    use fieldkit::adapters::log_sink::LogEventSink;
    use fieldkit::rpc::transport::NullTransport;

    let mut config = DeviceConfig::default();
    config.bootloader_delay_ms = 1;
    let mut engine = FieldKitEngine::new(config).unwrap();
    let mut kb = SimulatedKeyboard::new();
    let mut sink = LogEventSink::new();

    let out = engine
        .process_report(&request("STATUS"), &mut NullTransport, &mut kb, &mut sink)
        .unwrap();
    assert_eq!(out.command, Command::Status);
    assert!(!kb.in_bootloader());

    engine.process_report(&request("REBOOT_BOOTLOADER"), &mut NullTransport, &mut kb, &mut sink);
    assert!(kb.in_bootloader());
    assert_eq!(kb.bootloader_requests(), 1);
}
