//! A connection to one IRC server.
//!
//! [`Connection`] owns the read half of the stream inside a [`LineFramer`].
//! Writes go through [`Sender`], which can be cloned and handed to other
//! tasks; every command is written whole while the writer lock is held.
//!
//! ```no_run
//! use slirc_wire::{ClientConfig, Connection, Message};
//!
//! # async fn run() -> slirc_wire::Result<()> {
//! let config = ClientConfig::new("irc.libera.chat", "PRBot").with_channel("#prbottest");
//! let mut conn = Connection::connect(&config).await?;
//! let sender = conn.sender();
//!
//! sender.register(&config.nickname).await?;
//! while let Some(msg) = conn.receive().await? {
//!     if let Message::Ping { text } = msg {
//!         sender.pong(text).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::encode::{Command, MAX_COMMAND_LEN};
use crate::error::{Operation, ProtocolError, Result};
use crate::line::{LineBuffer, LineFramer};
use crate::message::Message;
use crate::transport::{self, ConnectOptions};

/// Cloneable write handle for one connection.
///
/// A write that fails or times out may leave a fragment on the wire. After
/// that every later command is refused with [`ProtocolError::Write`] instead
/// of being appended to the fragment.
pub struct Sender<W = OwnedWriteHalf> {
    writer: Arc<Mutex<Writer<W>>>,
    write_timeout: Option<Duration>,
}

struct Writer<W> {
    inner: W,
    /// Set once a command was left incomplete.
    poisoned: bool,
}

impl<W> Clone for Sender<W> {
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
            write_timeout: self.write_timeout,
        }
    }
}

impl<W> std::fmt::Debug for Sender<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sender")
            .field("write_timeout", &self.write_timeout)
            .field("handles", &Arc::strong_count(&self.writer))
            .finish()
    }
}

impl<W> Sender<W> {
    pub fn new(writer: W, write_timeout: Option<Duration>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Writer {
                inner: writer,
                poisoned: false,
            })),
            write_timeout,
        }
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout
    }
}

impl<W: AsyncWrite + Unpin> Sender<W> {
    /// Answer a keepalive probe with `PONG :text`.
    pub async fn pong(&self, text: &str) -> Result<()> {
        self.send(&Command::pong(text)).await
    }

    pub async fn join(&self, channel: &str) -> Result<()> {
        self.send(&Command::join(channel)).await
    }

    /// Send `NICK` and `USER` for `nick`.
    pub async fn register(&self, nick: &str) -> Result<()> {
        self.send(&Command::register(nick)).await
    }

    pub async fn privmsg(&self, channel: &str, text: &str) -> Result<()> {
        self.send(&Command::privmsg(channel, text)).await
    }

    /// Validate, encode and write one command.
    ///
    /// Nothing reaches the stream unless the whole command encodes within
    /// [`MAX_COMMAND_LEN`] bytes.
    pub async fn send(&self, command: &Command<'_>) -> Result<()> {
        let mut buf = [0u8; MAX_COMMAND_LEN];
        let n = command.encode_bounded(&mut buf)?;
        let bytes = &buf[..n];

        let mut writer = self.writer.lock().await;
        if writer.poisoned {
            return Err(ProtocolError::Write(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "an earlier command was left incomplete",
            )));
        }

        let inner = &mut writer.inner;
        let write = async {
            inner.write_all(bytes).await?;
            inner.flush().await
        };

        let result = match self.write_timeout {
            Some(after) => match tokio::time::timeout(after, write).await {
                Ok(result) => result.map_err(ProtocolError::Write),
                Err(_) => Err(ProtocolError::Timeout {
                    op: Operation::Write,
                    after,
                }),
            },
            None => write.await.map_err(ProtocolError::Write),
        };
        if let Err(e) = result {
            warn!(command = command.name(), error = %e, "write failed, sender disabled");
            writer.poisoned = true;
            return Err(e);
        }

        debug!(command = command.name(), bytes = n, "sent");
        Ok(())
    }

    /// Shut down the write side of the stream.
    async fn shutdown(&self) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.inner.shutdown().await.map_err(ProtocolError::Shutdown)
    }
}

/// One client connection: a framed reader plus a [`Sender`].
pub struct Connection<R = OwnedReadHalf, W = OwnedWriteHalf> {
    framer: LineFramer<R>,
    sender: Sender<W>,
}

impl Connection {
    /// Resolve and connect to the configured server.
    ///
    /// Nothing is sent; call [`register`](Self::register) and
    /// [`join`](Self::join) afterwards.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let options = ConnectOptions {
            prefer_ipv4: config.prefer_ipv4,
            timeout: config.connect_timeout,
        };
        let stream = transport::connect_with(&config.host, config.port, options).await?;
        Self::from_stream(stream, config)
    }

    /// Wrap an already connected stream.
    pub fn from_stream(stream: TcpStream, config: &ClientConfig) -> Result<Self> {
        let (reader, writer) = stream.into_split();
        Self::from_parts(reader, writer, config)
    }
}

impl<R, W> Connection<R, W> {
    /// Build a connection over any reader/writer pair, using the buffer
    /// capacity and deadlines from `config`.
    pub fn from_parts(reader: R, writer: W, config: &ClientConfig) -> Result<Self> {
        let buffer = LineBuffer::new(config.buffer_capacity)?;
        Ok(Self {
            framer: LineFramer::with_buffer(reader, buffer)
                .with_read_timeout(config.read_timeout),
            sender: Sender::new(writer, config.write_timeout),
        })
    }

    /// A handle for writing from elsewhere, e.g. another task.
    pub fn sender(&self) -> Sender<W> {
        self.sender.clone()
    }
}

impl<R: AsyncRead + Unpin, W> Connection<R, W> {
    /// The next raw line, without its terminator. `Ok(None)` at end of stream.
    pub async fn next_line(&mut self) -> Result<Option<&[u8]>> {
        self.framer.next_line().await
    }

    /// The next line, classified.
    ///
    /// Lines that are not UTF-8 classify as [`Message::Unknown`].
    pub async fn receive(&mut self) -> Result<Option<Message<'_>>> {
        let line = match self.framer.next_line().await? {
            Some(line) => line,
            None => return Ok(None),
        };

        let msg = Message::parse_bytes(line);
        if msg.is_unknown() {
            trace!(line = %String::from_utf8_lossy(line), "unrecognized line");
        }
        Ok(Some(msg))
    }
}

impl<R, W: AsyncWrite + Unpin> Connection<R, W> {
    pub async fn pong(&self, text: &str) -> Result<()> {
        self.sender.pong(text).await
    }

    pub async fn join(&self, channel: &str) -> Result<()> {
        self.sender.join(channel).await
    }

    pub async fn register(&self, nick: &str) -> Result<()> {
        self.sender.register(nick).await
    }

    pub async fn privmsg(&self, channel: &str, text: &str) -> Result<()> {
        self.sender.privmsg(channel, text).await
    }

    pub async fn send(&self, command: &Command<'_>) -> Result<()> {
        self.sender.send(command).await
    }

    /// Close the connection.
    ///
    /// The write side is shut down even if other [`Sender`] clones are still
    /// alive; their later writes fail.
    pub async fn disconnect(self) -> Result<()> {
        let Connection { framer, sender } = self;
        drop(framer);
        sender.shutdown().await?;
        debug!("disconnected");
        Ok(())
    }
}
