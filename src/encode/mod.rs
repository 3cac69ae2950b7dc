//! Outbound command encoding.
//!
//! This module provides the [`IrcEncode`] trait for writing commands directly
//! to byte buffers, plus a bounded variant that refuses to produce a partial
//! command.
//!
//! # Example
//!
//! ```
//! use slirc_wire::encode::{Command, IrcEncode, MAX_COMMAND_LEN};
//!
//! let cmd = Command::privmsg("#channel", "Hello!");
//! let mut buf = [0u8; MAX_COMMAND_LEN];
//! let n = cmd.encode_bounded(&mut buf).unwrap();
//!
//! assert_eq!(&buf[..n], b"PRIVMSG #channel :Hello!\r\n");
//! ```

use std::io::{self, Write};

use crate::error::{ProtocolError, Result};

mod command;

pub use self::command::Command;

/// Size of the buffer one outbound command must fit in.
///
/// The limit includes the `\r\n` terminator and is inclusive: a command of
/// exactly this many bytes is sent. No byte is reserved for a NUL.
pub const MAX_COMMAND_LEN: usize = 1024;

/// Longest nickname accepted for registration, in characters.
pub const MAX_NICK_LEN: usize = 30;

/// A trait for encoding IRC protocol elements directly to a byte stream.
pub trait IrcEncode {
    /// Encode this value to the given writer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the write fails.
    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<usize>;

    /// Number of bytes [`encode`](Self::encode) produces.
    fn encoded_len(&self) -> usize {
        self.encode(&mut io::sink()).unwrap_or(0)
    }

    /// Encode into `buf`, failing with [`ProtocolError::Format`] if the whole
    /// encoding does not fit.
    ///
    /// On failure the contents of `buf` are unspecified and must not be sent.
    fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        let limit = buf.len();
        let mut cursor = io::Cursor::new(buf);
        match self.encode(&mut cursor) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WriteZero => Err(ProtocolError::Format {
                needed: self.encoded_len(),
                limit,
            }),
            Err(e) => Err(ProtocolError::Write(e)),
        }
    }

    /// Encode this value to a new `Vec<u8>`.
    #[must_use]
    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(512);
        let _ = self.encode(&mut buf);
        buf
    }
}

/// Write each part in order, returning the total length.
pub(crate) fn write_parts<W: Write>(w: &mut W, parts: &[&str]) -> io::Result<usize> {
    let mut written = 0;
    for part in parts {
        w.write_all(part.as_bytes())?;
        written += part.len();
    }
    Ok(written)
}
