//! Async line framer.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

use crate::error::{Operation, ProtocolError, Result};

use super::LineBuffer;

/// Reads lines from a stream into a fixed [`LineBuffer`].
///
/// At most one line is outstanding: the slice returned by
/// [`next_line`](Self::next_line) borrows the framer, and the next call
/// shifts it out of the buffer before looking for another.
///
/// # Usage
///
/// ```ignore
/// let mut framer = LineFramer::new(read_half);
/// while let Some(line) = framer.next_line().await? {
///     // line has no terminator and is valid until the next call
/// }
/// ```
pub struct LineFramer<R> {
    reader: R,
    buffer: LineBuffer,
    read_timeout: Option<Duration>,
}

impl<R> LineFramer<R> {
    /// Wrap `reader` with a buffer of the default capacity.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: LineBuffer::default(),
            read_timeout: None,
        }
    }

    /// Wrap `reader` with an existing buffer, keeping whatever it holds.
    pub fn with_buffer(reader: R, buffer: LineBuffer) -> Self {
        Self {
            reader,
            buffer,
            read_timeout: None,
        }
    }

    /// Bound each individual read by `timeout`.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// The underlying buffer, e.g. to check how much input is pending.
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// Give back the reader and the buffer, including any bytes read but not
    /// yet framed. [`with_buffer`](Self::with_buffer) resumes from them.
    pub fn into_parts(self) -> (R, LineBuffer) {
        (self.reader, self.buffer)
    }
}

impl<R: AsyncRead + Unpin> LineFramer<R> {
    /// Wait for the next complete line.
    ///
    /// Returns `Ok(None)` when the peer closes the stream. Bytes of an
    /// unterminated trailing line are dropped at that point.
    pub async fn next_line(&mut self) -> Result<Option<&[u8]>> {
        self.buffer.discard_active();

        let mut found = self.buffer.next_line()?.is_some();
        while !found {
            let n = self.fill().await?;
            if n == 0 {
                if self.buffer.occupied() > 0 {
                    debug!(
                        partial = self.buffer.occupied(),
                        "stream closed with an unterminated line"
                    );
                }
                return Ok(None);
            }
            found = self.buffer.commit(n)?;
        }

        let line = self.buffer.line();
        if let Some(line) = line {
            trace!(line = %String::from_utf8_lossy(line), "framed line");
        }
        Ok(line)
    }

    /// Like [`next_line`](Self::next_line), as UTF-8 text.
    ///
    /// A line that is not valid UTF-8 yields [`ProtocolError::InvalidUtf8`];
    /// it is still consumed, so the next call moves on.
    pub async fn next_str(&mut self) -> Result<Option<&str>> {
        match self.next_line().await? {
            Some(line) => Ok(Some(std::str::from_utf8(line)?)),
            None => Ok(None),
        }
    }

    async fn fill(&mut self) -> Result<usize> {
        let spare = self.buffer.spare_mut();
        let read = self.reader.read(spare);
        match self.read_timeout {
            Some(after) => match tokio::time::timeout(after, read).await {
                Ok(result) => result.map_err(ProtocolError::Read),
                Err(_) => Err(ProtocolError::Timeout {
                    op: Operation::Read,
                    after,
                }),
            },
            None => read.await.map_err(ProtocolError::Read),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[tokio::test]
    async fn test_lines_from_cursor() {
        let mut framer = LineFramer::new(Cursor::new(b"CMD\r\nCAP\nLAST".to_vec()));
        assert_eq!(framer.next_line().await.unwrap(), Some(&b"CMD"[..]));
        assert_eq!(framer.next_line().await.unwrap(), Some(&b"CAP"[..]));
        assert_eq!(framer.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_next_str_rejects_invalid_utf8() {
        let mut framer = LineFramer::new(Cursor::new(b"\xff\xfe\r\nok\r\n".to_vec()));
        assert!(matches!(
            framer.next_str().await,
            Err(ProtocolError::InvalidUtf8(_))
        ));
        assert_eq!(framer.next_str().await.unwrap(), Some("ok"));
    }

    #[tokio::test]
    async fn test_line_too_long_is_reported() {
        let buffer = LineBuffer::new(8).unwrap();
        let data = b"0123456789abcdef\nshort\n".to_vec();
        let mut framer = LineFramer::with_buffer(Cursor::new(data), buffer);

        assert!(matches!(
            framer.next_line().await,
            Err(ProtocolError::LineTooLong { limit: 8 })
        ));
        assert_eq!(framer.next_line().await.unwrap(), Some(&b"short"[..]));
        assert_eq!(framer.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_into_parts_keeps_pending_bytes() {
        let mut framer = LineFramer::new(Cursor::new(b"first\r\nsec".to_vec()));
        assert_eq!(framer.next_line().await.unwrap(), Some(&b"first"[..]));
        assert_eq!(framer.buffer().occupied(), 10);

        let (_reader, buffer) = framer.into_parts();
        let mut resumed = LineFramer::with_buffer(Cursor::new(b"ond\n".to_vec()), buffer);
        assert_eq!(resumed.next_line().await.unwrap(), Some(&b"second"[..]));
        assert_eq!(resumed.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_timeout() {
        let (client, _server) = tokio::io::duplex(64);
        let mut framer =
            LineFramer::new(client).with_read_timeout(Some(Duration::from_millis(20)));

        let err = framer.next_line().await.unwrap_err();
        assert!(err.is_timeout());
    }
}
