//! Fuzz target for the line buffer
//!
//! The first byte picks the capacity and chunk size, the rest is fed in
//! chunks. No framed line may contain a `\n` or exceed the capacity.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_wire::LineBuffer;

fuzz_target!(|data: &[u8]| {
    let Some((&knob, stream)) = data.split_first() else {
        return;
    };
    let capacity = 2 + (knob as usize & 0x3f);
    let chunk = 1 + (knob as usize >> 6);

    let mut buf = match LineBuffer::new(capacity) {
        Ok(buf) => buf,
        Err(_) => return,
    };

    for piece in stream.chunks(chunk) {
        let mut rest = piece;
        while !rest.is_empty() {
            let n = buf.feed(rest);
            rest = &rest[n..];
            loop {
                match buf.next_line() {
                    Ok(Some(line)) => {
                        assert!(!line.contains(&b'\n'));
                        assert!(line.len() < capacity);
                    }
                    Ok(None) => break,
                    Err(_) => {}
                }
            }
        }
    }
});
