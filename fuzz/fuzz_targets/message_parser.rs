//! Fuzz target for message classification
//!
//! Classification must never panic on arbitrary bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 {
        return;
    }

    let msg = slirc_wire::Message::parse_bytes(data);
    if let Some(source) = msg.source() {
        assert!(!source.nick.contains(' '));
    }
    let _ = msg.to_owned_message();
});
