//! Line framing over a byte stream.
//!
//! [`LineBuffer`] is the I/O-free state machine; [`LineFramer`] drives one
//! from any [`AsyncRead`](tokio::io::AsyncRead).
//!
//! Inbound lines end with `\n`; a `\r` directly before it is stripped.

mod buffer;
mod framer;

pub use self::buffer::LineBuffer;
pub use self::framer::LineFramer;

/// Default line buffer capacity in bytes.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Smallest usable capacity: one byte of content plus the terminator.
pub const MIN_BUFFER_CAPACITY: usize = 2;

#[inline]
fn find_lf(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&b| b == b'\n')
}

#[inline]
fn strip_cr(line: &[u8]) -> &[u8] {
    match line.split_last() {
        Some((b'\r', head)) => head,
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_cr() {
        assert_eq!(strip_cr(b"abc\r"), b"abc");
        assert_eq!(strip_cr(b"abc"), b"abc");
        assert_eq!(strip_cr(b"\r"), b"");
        assert_eq!(strip_cr(b""), b"");
    }

    #[test]
    fn test_find_lf() {
        assert_eq!(find_lf(b"ab\ncd\n"), Some(2));
        assert_eq!(find_lf(b"abcd"), None);
    }
}
