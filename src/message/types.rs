//! Classified message types.

use crate::prefix::{Hostmask, OwnedHostmask};

use super::nom_parser;

/// One inbound line, classified.
///
/// Every string borrows the line it was parsed from. Use
/// [`to_owned_message`](Self::to_owned_message) to keep a message past the
/// next read or hand it to another task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message<'a> {
    /// Anything not recognized, including recognized commands with a
    /// malformed source.
    Unknown,
    /// `PING :text`. The text may be empty: `PING :` still asks for a PONG.
    Ping { text: &'a str },
    /// `:nick!user@host PART #channel`
    Part {
        source: Hostmask<'a>,
        channel: &'a str,
    },
    /// `:nick!user@host JOIN :#channel`
    Join {
        source: Hostmask<'a>,
        channel: &'a str,
    },
    /// `:nick!user@host PRIVMSG channel :text`
    Privmsg {
        source: Hostmask<'a>,
        channel: &'a str,
        text: &'a str,
    },
    /// `:nick!user@host KICK channel target :reason`
    Kick {
        source: Hostmask<'a>,
        channel: &'a str,
        target: &'a str,
        reason: &'a str,
    },
}

/// The variant of a [`Message`] without its fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    Unknown,
    Ping,
    Part,
    Join,
    Privmsg,
    Kick,
}

impl<'a> Message<'a> {
    /// Classify one line. Never fails; unrecognized input is
    /// [`Message::Unknown`].
    ///
    /// A single trailing `\r\n`, `\n` or `\r` is ignored.
    ///
    /// ```
    /// use slirc_wire::Message;
    ///
    /// let msg = Message::parse(":nick!user@host PRIVMSG #chan :hi there\r\n");
    /// match msg {
    ///     Message::Privmsg { source, channel, text } => {
    ///         assert_eq!(source.nick, "nick");
    ///         assert_eq!(channel, "#chan");
    ///         assert_eq!(text, "hi there");
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn parse(line: &'a str) -> Self {
        nom_parser::classify(trim_terminator(line))
    }

    /// Classify raw bytes. Lines that are not UTF-8 are [`Message::Unknown`].
    pub fn parse_bytes(line: &'a [u8]) -> Self {
        match std::str::from_utf8(line) {
            Ok(line) => Self::parse(line),
            Err(_) => Message::Unknown,
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Unknown => MessageKind::Unknown,
            Message::Ping { .. } => MessageKind::Ping,
            Message::Part { .. } => MessageKind::Part,
            Message::Join { .. } => MessageKind::Join,
            Message::Privmsg { .. } => MessageKind::Privmsg,
            Message::Kick { .. } => MessageKind::Kick,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Message::Unknown)
    }

    /// The originator, for channel events.
    pub fn source(&self) -> Option<Hostmask<'a>> {
        match *self {
            Message::Part { source, .. }
            | Message::Join { source, .. }
            | Message::Privmsg { source, .. }
            | Message::Kick { source, .. } => Some(source),
            Message::Unknown | Message::Ping { .. } => None,
        }
    }

    /// The channel (or, for PRIVMSG, the target) the event applies to.
    pub fn channel(&self) -> Option<&'a str> {
        match *self {
            Message::Part { channel, .. }
            | Message::Join { channel, .. }
            | Message::Privmsg { channel, .. }
            | Message::Kick { channel, .. } => Some(channel),
            Message::Unknown | Message::Ping { .. } => None,
        }
    }

    pub fn to_owned_message(&self) -> OwnedMessage {
        match *self {
            Message::Unknown => OwnedMessage::Unknown,
            Message::Ping { text } => OwnedMessage::Ping {
                text: text.to_string(),
            },
            Message::Part { source, channel } => OwnedMessage::Part {
                source: source.to_owned_hostmask(),
                channel: channel.to_string(),
            },
            Message::Join { source, channel } => OwnedMessage::Join {
                source: source.to_owned_hostmask(),
                channel: channel.to_string(),
            },
            Message::Privmsg {
                source,
                channel,
                text,
            } => OwnedMessage::Privmsg {
                source: source.to_owned_hostmask(),
                channel: channel.to_string(),
                text: text.to_string(),
            },
            Message::Kick {
                source,
                channel,
                target,
                reason,
            } => OwnedMessage::Kick {
                source: source.to_owned_hostmask(),
                channel: channel.to_string(),
                target: target.to_string(),
                reason: reason.to_string(),
            },
        }
    }
}

/// Owned copy of a [`Message`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OwnedMessage {
    Unknown,
    Ping {
        text: String,
    },
    Part {
        source: OwnedHostmask,
        channel: String,
    },
    Join {
        source: OwnedHostmask,
        channel: String,
    },
    Privmsg {
        source: OwnedHostmask,
        channel: String,
        text: String,
    },
    Kick {
        source: OwnedHostmask,
        channel: String,
        target: String,
        reason: String,
    },
}

impl OwnedMessage {
    pub fn as_message(&self) -> Message<'_> {
        match self {
            OwnedMessage::Unknown => Message::Unknown,
            OwnedMessage::Ping { text } => Message::Ping { text },
            OwnedMessage::Part { source, channel } => Message::Part {
                source: source.as_hostmask(),
                channel,
            },
            OwnedMessage::Join { source, channel } => Message::Join {
                source: source.as_hostmask(),
                channel,
            },
            OwnedMessage::Privmsg {
                source,
                channel,
                text,
            } => Message::Privmsg {
                source: source.as_hostmask(),
                channel,
                text,
            },
            OwnedMessage::Kick {
                source,
                channel,
                target,
                reason,
            } => Message::Kick {
                source: source.as_hostmask(),
                channel,
                target,
                reason,
            },
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.as_message().kind()
    }
}

impl From<Message<'_>> for OwnedMessage {
    fn from(message: Message<'_>) -> Self {
        message.to_owned_message()
    }
}

fn trim_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
