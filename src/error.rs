//! Error types for the IRC client core.
//!
//! Transport, framing and encoding failures are all reported through
//! [`ProtocolError`]. A clean end of stream is not an error: readers return
//! `Ok(None)` instead. Message classification never fails.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// The blocking operation a deadline was attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Establishing a TCP connection to one candidate address.
    Connect,
    /// A single read from the server.
    Read,
    /// Writing one encoded command.
    Write,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Connect => "connect",
            Operation::Read => "read",
            Operation::Write => "write",
        })
    }
}

/// Top-level client errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The host/port pair could not be resolved to any address.
    #[error("cannot resolve {host}:{port}")]
    Resolution {
        /// Host name as given by the caller.
        host: String,
        /// Port as given by the caller.
        port: u16,
        /// Resolver error, absent when resolution succeeded with no addresses.
        #[source]
        source: Option<std::io::Error>,
    },

    /// Every resolved address refused or failed the connection.
    #[error("no address accepted the connection ({addr_count} tried)")]
    Connection {
        /// Number of candidate addresses attempted.
        addr_count: usize,
        /// Error from the last attempted candidate.
        #[source]
        source: std::io::Error,
    },

    /// I/O error while reading from the server.
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),

    /// I/O error while writing to the server, including short writes.
    #[error("write error: {0}")]
    Write(#[source] std::io::Error),

    /// Error while shutting the connection down.
    #[error("shutdown error: {0}")]
    Shutdown(#[source] std::io::Error),

    /// A per-operation deadline expired.
    #[error("{op} timed out after {after:?}")]
    Timeout {
        /// The operation that did not complete.
        op: Operation,
        /// The configured deadline.
        after: Duration,
    },

    /// A line filled the whole framing buffer without a terminator.
    #[error("line exceeds the {limit} byte framing buffer")]
    LineTooLong {
        /// Capacity of the framing buffer.
        limit: usize,
    },

    /// A framed line was requested as text but is not valid UTF-8.
    #[error("line is not valid utf-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// An outbound command does not fit the bounded command buffer.
    #[error("command needs {needed} bytes, limit is {limit}")]
    Format {
        /// Bytes the encoded command requires.
        needed: usize,
        /// Size of the command buffer.
        limit: usize,
    },

    /// A caller-supplied argument is not acceptable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ProtocolError {
    /// Whether this error came from a deadline expiring.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProtocolError::Timeout { .. })
    }

    /// Whether the connection can keep being used after this error.
    ///
    /// Oversized lines and rejected outbound commands leave the stream in a
    /// consistent state; transport failures do not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProtocolError::LineTooLong { .. }
                | ProtocolError::InvalidUtf8(_)
                | ProtocolError::Format { .. }
                | ProtocolError::InvalidArgument(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::LineTooLong { limit: 1024 };
        assert_eq!(
            format!("{}", err),
            "line exceeds the 1024 byte framing buffer"
        );

        let err = ProtocolError::Format {
            needed: 1030,
            limit: 1024,
        };
        assert_eq!(format!("{}", err), "command needs 1030 bytes, limit is 1024");

        let err = ProtocolError::Timeout {
            op: Operation::Read,
            after: Duration::from_secs(5),
        };
        assert_eq!(format!("{}", err), "read timed out after 5s");
    }

    #[test]
    fn test_error_source_chaining() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = ProtocolError::Connection {
            addr_count: 2,
            source: io_err,
        };

        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), "connection refused");

        let err = ProtocolError::Resolution {
            host: "irc.invalid".to_string(),
            port: 6667,
            source: None,
        };
        assert!(std::error::Error::source(&err).is_none());
        assert_eq!(err.to_string(), "cannot resolve irc.invalid:6667");
    }

    #[test]
    fn test_error_conversion() {
        let bytes = [0x66, 0xff, 0x6f];
        let utf8_err = std::str::from_utf8(&bytes).unwrap_err();
        let err: ProtocolError = utf8_err.into();

        match err {
            ProtocolError::InvalidUtf8(_) => {}
            _ => panic!("Expected InvalidUtf8 variant"),
        }
    }

    #[test]
    fn test_recoverable() {
        assert!(ProtocolError::LineTooLong { limit: 8 }.is_recoverable());
        assert!(ProtocolError::InvalidArgument("nick".into()).is_recoverable());
        assert!(!ProtocolError::Read(std::io::ErrorKind::BrokenPipe.into()).is_recoverable());

        let timeout = ProtocolError::Timeout {
            op: Operation::Write,
            after: Duration::from_millis(10),
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_recoverable());
    }
}
