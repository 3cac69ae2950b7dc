//! Inbound message classification.

mod nom_parser;
mod types;

pub use self::types::{Message, MessageKind, OwnedMessage};

/// Classify one line. Shorthand for [`Message::parse`].
pub fn parse(line: &str) -> Message<'_> {
    Message::parse(line)
}
