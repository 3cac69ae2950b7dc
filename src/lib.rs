//! # slirc-wire
//!
//! A small async IRC client core: TCP transport, line framing over a
//! fixed-size buffer, classification of the handful of messages a simple
//! bot reacts to, and bounded encoding of the commands it sends.
//!
//! ## Features
//!
//! - Connects to the first resolved address that accepts, IPv4 first
//! - Frames `\r\n` or `\n` terminated lines without allocating per line
//! - Classifies PING, JOIN, PART, PRIVMSG and KICK into borrowed views
//! - Encodes PONG, JOIN, NICK/USER and PRIVMSG into a bounded buffer
//! - Per-operation read, write and connect deadlines
//! - Optional `serde` support for [`ClientConfig`]

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Classifying lines
//!
//! ```rust
//! use slirc_wire::{parse, Message, MessageKind};
//!
//! let msg = parse(":alice!al@example.org KICK #rust bob :spam");
//! assert_eq!(msg.kind(), MessageKind::Kick);
//! assert_eq!(msg.source().map(|s| s.nick), Some("alice"));
//!
//! assert_eq!(parse(":irc.example.org 001 bot :Welcome"), Message::Unknown);
//! ```
//!
//! ### Encoding commands
//!
//! ```rust
//! use slirc_wire::{Command, IrcEncode};
//!
//! let bytes = Command::register("PRBot").to_bytes();
//! assert_eq!(bytes, b"NICK PRBot\r\nUSER PRBot 0 * :PRBot\r\n");
//! ```
//!
//! ### Framing a stream
//!
//! ```rust
//! use slirc_wire::LineBuffer;
//!
//! let mut buf = LineBuffer::new(64).unwrap();
//! buf.feed(b"PING :a\r\nPI");
//! assert_eq!(buf.next_line().unwrap(), Some(&b"PING :a"[..]));
//! assert_eq!(buf.next_line().unwrap(), None);
//! ```

pub mod client;
pub mod config;
pub mod encode;
pub mod error;
pub mod line;
pub mod message;
pub mod prefix;
pub mod transport;

pub use self::client::{Connection, Sender};
pub use self::config::{ClientConfig, DEFAULT_PORT};
pub use self::encode::{Command, IrcEncode, MAX_COMMAND_LEN, MAX_NICK_LEN};
pub use self::error::{Operation, ProtocolError, Result};
pub use self::line::{LineBuffer, LineFramer};
pub use self::message::{parse, Message, MessageKind, OwnedMessage};
pub use self::prefix::{Hostmask, OwnedHostmask};
pub use self::transport::{connect, connect_with, ConnectOptions};
