//! The commands this client sends.

use std::io::{self, Write};

use crate::error::{ProtocolError, Result};

use super::{write_parts, IrcEncode, MAX_COMMAND_LEN, MAX_NICK_LEN};

/// An outbound command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// `PONG :text`
    Pong { text: &'a str },
    /// `JOIN channel`
    Join { channel: &'a str },
    /// `NICK nick` followed by `USER nick 0 * :nick`
    Register { nick: &'a str },
    /// `PRIVMSG channel :text`
    Privmsg { channel: &'a str, text: &'a str },
}

impl<'a> Command<'a> {
    pub fn pong(text: &'a str) -> Self {
        Command::Pong { text }
    }

    pub fn join(channel: &'a str) -> Self {
        Command::Join { channel }
    }

    pub fn register(nick: &'a str) -> Self {
        Command::Register { nick }
    }

    pub fn privmsg(channel: &'a str, text: &'a str) -> Self {
        Command::Privmsg { channel, text }
    }

    /// The command verb, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Pong { .. } => "PONG",
            Command::Join { .. } => "JOIN",
            Command::Register { .. } => "NICK/USER",
            Command::Privmsg { .. } => "PRIVMSG",
        }
    }

    /// Reject arguments that cannot be sent as-is.
    ///
    /// No argument may contain CR, LF or NUL. Channels and nicknames must be a
    /// single non-empty word, and nicknames at most [`MAX_NICK_LEN`]
    /// characters.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Command::Pong { text } => check_text("PONG text", text),
            Command::Join { channel } => check_word("JOIN channel", channel),
            Command::Register { nick } => {
                check_word("nickname", nick)?;
                if nick.chars().count() > MAX_NICK_LEN {
                    return Err(ProtocolError::InvalidArgument(format!(
                        "nickname longer than {} characters",
                        MAX_NICK_LEN
                    )));
                }
                Ok(())
            }
            Command::Privmsg { channel, text } => {
                check_word("PRIVMSG target", channel)?;
                check_text("PRIVMSG text", text)
            }
        }
    }

    /// Validate, then encode into `buf`.
    pub fn encode_bounded(&self, buf: &mut [u8]) -> Result<usize> {
        self.validate()?;
        self.encode_into(buf)
    }

    /// Validate and encode into a fresh [`MAX_COMMAND_LEN`] buffer.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut buf = [0u8; MAX_COMMAND_LEN];
        let n = self.encode_bounded(&mut buf)?;
        Ok(buf[..n].to_vec())
    }
}

impl IrcEncode for Command<'_> {
    fn encode<W: Write>(&self, w: &mut W) -> io::Result<usize> {
        match *self {
            Command::Pong { text } => write_parts(w, &["PONG :", text, "\r\n"]),
            Command::Join { channel } => write_parts(w, &["JOIN ", channel, "\r\n"]),
            Command::Register { nick } => write_parts(
                w,
                &["NICK ", nick, "\r\n", "USER ", nick, " 0 * :", nick, "\r\n"],
            ),
            Command::Privmsg { channel, text } => {
                write_parts(w, &["PRIVMSG ", channel, " :", text, "\r\n"])
            }
        }
    }
}

fn check_text(what: &str, value: &str) -> Result<()> {
    if value.contains(['\r', '\n', '\0']) {
        return Err(ProtocolError::InvalidArgument(format!(
            "{} contains a line break or NUL",
            what
        )));
    }
    Ok(())
}

fn check_word(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ProtocolError::InvalidArgument(format!("{} is empty", what)));
    }
    if value.contains(' ') {
        return Err(ProtocolError::InvalidArgument(format!(
            "{} contains a space",
            what
        )));
    }
    check_text(what, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pong() {
        assert_eq!(Command::pong("irc.example.com").to_bytes(), b"PONG :irc.example.com\r\n");
    }

    #[test]
    fn test_encode_join() {
        assert_eq!(Command::join("#prbottest").to_bytes(), b"JOIN #prbottest\r\n");
    }

    #[test]
    fn test_encode_register() {
        assert_eq!(
            Command::register("PRBot7").to_bytes(),
            b"NICK PRBot7\r\nUSER PRBot7 0 * :PRBot7\r\n"
        );
    }

    #[test]
    fn test_encode_privmsg() {
        assert_eq!(
            Command::privmsg("#channel", "Hello world!").to_bytes(),
            b"PRIVMSG #channel :Hello world!\r\n"
        );
    }

    #[test]
    fn test_nick_length_limit() {
        let ok = "n".repeat(30);
        assert!(Command::register(&ok).validate().is_ok());

        let long = "n".repeat(31);
        assert!(matches!(
            Command::register(&long).validate(),
            Err(ProtocolError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_injection() {
        assert!(Command::privmsg("#c", "hi\r\nQUIT").validate().is_err());
        assert!(Command::pong("a\0b").validate().is_err());
        assert!(Command::join("#a #b").validate().is_err());
        assert!(Command::join("").validate().is_err());
        assert!(Command::register("a\nb").validate().is_err());
    }

    #[test]
    fn test_empty_text_allowed() {
        assert_eq!(Command::pong("").to_wire().unwrap(), b"PONG :\r\n");
        assert_eq!(Command::privmsg("#c", "").to_wire().unwrap(), b"PRIVMSG #c :\r\n");
    }

    #[test]
    fn test_oversized_privmsg_is_refused() {
        let text = "x".repeat(MAX_COMMAND_LEN);
        match Command::privmsg("#c", &text).to_wire() {
            Err(ProtocolError::Format { needed, limit }) => {
                assert_eq!(needed, MAX_COMMAND_LEN + "PRIVMSG #c :\r\n".len());
                assert_eq!(limit, MAX_COMMAND_LEN);
            }
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_exactly_full_buffer_fits() {
        let overhead = "PRIVMSG #c :\r\n".len();
        let text = "x".repeat(MAX_COMMAND_LEN - overhead);
        let wire = Command::privmsg("#c", &text).to_wire().unwrap();
        assert_eq!(wire.len(), MAX_COMMAND_LEN);
    }
}
