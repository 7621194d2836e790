//! Fuzz target: `MessageAccumulator::accumulate`
//!
//! Drives arbitrary byte sequences into the accumulator in uneven chunks
//! and asserts that it never panics, never yields a message longer than
//! the buffer, and keeps its fill level in bounds.
//!
//! cargo fuzz run fuzz_accumulator

#![no_main]

use fieldkit::rpc::codec::{MSG_BUFFER_SIZE, MessageAccumulator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut acc = MessageAccumulator::new();

    // First byte picks the chunk size so boundaries move around.
    let Some((&step, rest)) = data.split_first() else {
        return;
    };
    let step = usize::from(step).max(1);

    for chunk in rest.chunks(step) {
        if let Some(message) = acc.accumulate(chunk) {
            assert!(message.len() < MSG_BUFFER_SIZE, "message exceeds buffer");
            assert!(!message.contains(&0), "message must stop at NUL");
        }
        assert!(acc.len() < MSG_BUFFER_SIZE, "fill level out of bounds");
    }

    // After a reset the accumulator must accept bytes cleanly again.
    acc.reset();
    assert!(acc.is_empty());
    let _ = acc.accumulate(rest);
});
