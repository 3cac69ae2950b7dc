//! Fixed-capacity line buffer.

use tracing::{debug, warn};

use crate::error::{ProtocolError, Result};

use super::{find_lf, strip_cr};

/// Fixed-capacity byte region that exposes one complete line at a time.
///
/// Bytes enter at the tail (through [`feed`](Self::feed) or
/// [`spare_mut`](Self::spare_mut) + [`commit`](Self::commit)) and lines are
/// taken from the head. The active line stays in the buffer until
/// [`next_line`](Self::next_line) or [`discard_active`](Self::discard_active)
/// shifts it out, so a returned line never needs to be copied.
///
/// When the buffer fills up without a line terminator, the head is dropped
/// and [`ProtocolError::LineTooLong`] is returned. The buffer then skips input
/// up to and including the next `\n` and resumes normal framing.
///
/// ```
/// use slirc_wire::LineBuffer;
///
/// let mut buf = LineBuffer::new(64).unwrap();
/// buf.feed(b"PING :a\r\nPI");
/// assert_eq!(buf.next_line().unwrap(), Some(&b"PING :a"[..]));
/// assert_eq!(buf.next_line().unwrap(), None);
/// buf.feed(b"NG :b\n");
/// assert_eq!(buf.next_line().unwrap(), Some(&b"PING :b"[..]));
/// ```
#[derive(Debug)]
pub struct LineBuffer {
    buf: Box<[u8]>,
    occupied: usize,
    /// Offset of the active line's `\n`.
    active: Option<usize>,
    discarding: bool,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self {
            buf: vec![0; super::DEFAULT_BUFFER_CAPACITY].into_boxed_slice(),
            occupied: 0,
            active: None,
            discarding: false,
        }
    }
}

impl LineBuffer {
    /// Create a buffer holding at most `capacity` bytes, terminator included.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < super::MIN_BUFFER_CAPACITY {
            return Err(ProtocolError::InvalidArgument(format!(
                "line buffer capacity {} is below the minimum of {}",
                capacity,
                super::MIN_BUFFER_CAPACITY
            )));
        }
        Ok(Self {
            buf: vec![0; capacity].into_boxed_slice(),
            occupied: 0,
            active: None,
            discarding: false,
        })
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes currently held, including the active line and any partial tail.
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Offset of the active line's `\n` terminator, if a line is active.
    ///
    /// Discarding the line removes `active_len + 1` bytes.
    pub fn active_len(&self) -> Option<usize> {
        self.active
    }

    /// Whether input is being skipped after an oversized line.
    pub fn is_discarding(&self) -> bool {
        self.discarding
    }

    /// The active line without its terminator.
    pub fn line(&self) -> Option<&[u8]> {
        self.active.map(|end| strip_cr(&self.buf[..end]))
    }

    /// Shift the active line and its `\n` out of the buffer.
    pub fn discard_active(&mut self) {
        if let Some(end) = self.active.take() {
            self.consume(end + 1);
        }
    }

    /// Copy as many bytes as fit into the free tail. Returns the count copied.
    ///
    /// Free space behind an active line is only reclaimed by the next
    /// [`next_line`](Self::next_line), so a caller that feeds while a line is
    /// active may see fewer bytes accepted.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let spare = &mut self.buf[self.occupied..];
        let n = bytes.len().min(spare.len());
        spare[..n].copy_from_slice(&bytes[..n]);
        self.occupied += n;
        n
    }

    /// Discard the active line and return the next complete one, if buffered.
    ///
    /// Performs no I/O. `Ok(None)` means more bytes are needed.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>> {
        self.discard_active();
        if self.scan(0)? {
            Ok(self.line())
        } else {
            Ok(None)
        }
    }

    /// The free tail `[occupied, capacity)`, for reading directly into.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.occupied..]
    }

    /// Account for `n` bytes written into [`spare_mut`](Self::spare_mut).
    ///
    /// Only the new bytes are scanned, since everything before them is known
    /// to be free of terminators. Returns whether a line is active.
    ///
    /// A line that is still active stays active; the new bytes are only
    /// looked at once [`next_line`](Self::next_line) has discarded it.
    pub fn commit(&mut self, n: usize) -> Result<bool> {
        let from = self.occupied;
        self.occupied = (self.occupied + n).min(self.capacity());
        self.scan(from)
    }

    /// Look for a terminator in `[from, occupied)` and activate the line.
    fn scan(&mut self, from: usize) -> Result<bool> {
        if self.active.is_some() {
            return Ok(true);
        }

        if self.discarding {
            match find_lf(&self.buf[..self.occupied]) {
                Some(end) => {
                    debug!(skipped = end + 1, "resynchronized after oversized line");
                    self.consume(end + 1);
                    self.discarding = false;
                    return self.scan(0);
                }
                None => {
                    self.occupied = 0;
                    return Ok(false);
                }
            }
        }

        if let Some(offset) = find_lf(&self.buf[from..self.occupied]) {
            self.active = Some(from + offset);
            return Ok(true);
        }

        if self.occupied == self.capacity() {
            let limit = self.capacity();
            warn!(limit, "inbound line exceeds buffer, skipping to next terminator");
            self.occupied = 0;
            self.discarding = true;
            return Err(ProtocolError::LineTooLong { limit });
        }

        Ok(false)
    }

    fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.occupied);
        self.buf.copy_within(n..self.occupied, 0);
        self.occupied -= n;
    }
}
