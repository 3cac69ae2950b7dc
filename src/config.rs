//! Connection settings.

use std::time::Duration;

use crate::encode::MAX_NICK_LEN;
use crate::error::{ProtocolError, Result};
use crate::line::{DEFAULT_BUFFER_CAPACITY, MIN_BUFFER_CAPACITY};

/// Default plaintext IRC port.
pub const DEFAULT_PORT: u16 = 6667;

/// Settings for [`Connection::connect`](crate::Connection::connect).
///
/// ```
/// use std::time::Duration;
/// use slirc_wire::ClientConfig;
///
/// let config = ClientConfig::new("irc.example.net", "wirebot")
///     .with_channel("#wire")
///     .with_read_timeout(Some(Duration::from_secs(300)));
/// assert_eq!(config.port, 6667);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Nickname used for NICK/USER registration.
    pub nickname: String,
    /// Channels the caller intends to join after registration.
    pub channels: Vec<String>,
    /// Capacity of the fixed line buffer, which bounds the longest inbound line.
    pub buffer_capacity: usize,
    /// Try IPv4 addresses before other families.
    pub prefer_ipv4: bool,
    /// Deadline for each candidate connect attempt.
    pub connect_timeout: Option<Duration>,
    /// Deadline for each read. `None` waits forever.
    pub read_timeout: Option<Duration>,
    /// Deadline for writing one command.
    pub write_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            nickname: String::new(),
            channels: Vec::new(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            prefer_ipv4: true,
            connect_timeout: Some(Duration::from_secs(30)),
            read_timeout: None,
            write_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            nickname: nickname.into(),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channels.push(channel.into());
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_prefer_ipv4(mut self, prefer: bool) -> Self {
        self.prefer_ipv4 = prefer;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Check the settings before any network activity.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ProtocolError::InvalidArgument("host is empty".to_string()));
        }
        if self.buffer_capacity < MIN_BUFFER_CAPACITY {
            return Err(ProtocolError::InvalidArgument(format!(
                "buffer capacity {} is below the minimum of {}",
                self.buffer_capacity, MIN_BUFFER_CAPACITY
            )));
        }
        if self.nickname.chars().count() > MAX_NICK_LEN {
            return Err(ProtocolError::InvalidArgument(format!(
                "nickname longer than {} characters",
                MAX_NICK_LEN
            )));
        }
        for timeout in [self.connect_timeout, self.read_timeout, self.write_timeout]
            .into_iter()
            .flatten()
        {
            if timeout.is_zero() {
                return Err(ProtocolError::InvalidArgument(
                    "timeouts must be non-zero; use None to disable".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.port, 6667);
        assert_eq!(config.buffer_capacity, 1024);
        assert!(config.prefer_ipv4);
        assert!(config.read_timeout.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("localhost", "bot")
            .with_port(7000)
            .with_channel("#a")
            .with_channel("#b")
            .with_prefer_ipv4(false);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 7000);
        assert_eq!(config.channels, vec!["#a".to_string(), "#b".to_string()]);
        assert!(!config.prefer_ipv4);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(ClientConfig::default().validate().is_err());

        let tiny = ClientConfig::new("localhost", "bot")
            .with_buffer_capacity(MIN_BUFFER_CAPACITY - 1);
        assert!(matches!(
            tiny.validate(),
            Err(ProtocolError::InvalidArgument(_))
        ));
        let smallest = ClientConfig::new("localhost", "bot")
            .with_buffer_capacity(MIN_BUFFER_CAPACITY);
        assert!(smallest.validate().is_ok());

        let long_nick = ClientConfig::new("localhost", "n".repeat(31));
        assert!(long_nick.validate().is_err());

        let zero = ClientConfig::new("localhost", "bot").with_read_timeout(Some(Duration::ZERO));
        assert!(zero.validate().is_err());
    }
}
