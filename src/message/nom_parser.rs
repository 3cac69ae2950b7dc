//! Nom-based message classifier.
//!
//! Each rule matches the shape of one command. Rules are tried in a fixed
//! order and the first match decides the result: a line whose shape matches
//! but whose source is not `nick!user@host` is [`Message::Unknown`] and no
//! later rule is tried.

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::char,
    combinator::{peek, rest},
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::prefix::Hostmask;

use super::Message;

type ParseResult<'a, O> = IResult<&'a str, O>;

/// Classify a line that has no terminator.
pub(crate) fn classify(line: &str) -> Message<'_> {
    ping(line)
        .or_else(|| part(line))
        .or_else(|| join(line))
        .or_else(|| privmsg(line))
        .or_else(|| kick(line))
        .unwrap_or(Message::Unknown)
}

/// Leading `:source ` segment; everything up to the first space.
fn source(input: &str) -> ParseResult<'_, &str> {
    preceded(char(':'), terminated(take_until(" "), char(' ')))(input)
}

/// `PING :text`
fn ping_text(input: &str) -> ParseResult<'_, &str> {
    preceded(tag("PING :"), rest)(input)
}

/// `PART #channel...`; the channel is the rest of the line.
fn part_fields(input: &str) -> ParseResult<'_, &str> {
    preceded(tag("PART "), preceded(peek(char('#')), rest))(input)
}

/// `JOIN :#channel...`; the channel is the rest of the line.
fn join_fields(input: &str) -> ParseResult<'_, &str> {
    preceded(tag("JOIN :"), preceded(peek(char('#')), rest))(input)
}

/// `PRIVMSG channel :text`
fn privmsg_fields(input: &str) -> ParseResult<'_, (&str, &str)> {
    preceded(
        tag("PRIVMSG "),
        tuple((take_until(" "), preceded(tag(" :"), rest))),
    )(input)
}

/// `KICK channel target :reason`
fn kick_fields(input: &str) -> ParseResult<'_, (&str, &str, &str)> {
    preceded(
        tag("KICK "),
        tuple((
            take_until(" "),
            preceded(char(' '), take_until(" ")),
            preceded(tag(" :"), rest),
        )),
    )(input)
}

fn ping(line: &str) -> Option<Message<'_>> {
    let (_, text) = ping_text(line).ok()?;
    Some(Message::Ping { text })
}

/// Match `:source <command...>` where `fields` accepts the command part.
///
/// `None` if the shape does not match; `Some(Message::Unknown)` if it does
/// but the source is malformed.
fn sourced<'a, O>(
    line: &'a str,
    fields: fn(&'a str) -> ParseResult<'a, O>,
    build: impl FnOnce(Hostmask<'a>, O) -> Message<'a>,
) -> Option<Message<'a>> {
    let (command, raw_source) = source(line).ok()?;
    let (_, fields) = fields(command).ok()?;

    match Hostmask::parse(raw_source) {
        Some(mask) => Some(build(mask, fields)),
        None => {
            tracing::trace!(source = raw_source, "malformed source");
            Some(Message::Unknown)
        }
    }
}

fn part(line: &str) -> Option<Message<'_>> {
    sourced(line, part_fields, |source, channel| Message::Part {
        source,
        channel,
    })
}

fn join(line: &str) -> Option<Message<'_>> {
    sourced(line, join_fields, |source, channel| Message::Join {
        source,
        channel,
    })
}

fn privmsg(line: &str) -> Option<Message<'_>> {
    sourced(line, privmsg_fields, |source, (channel, text)| {
        Message::Privmsg {
            source,
            channel,
            text,
        }
    })
}

fn kick(line: &str) -> Option<Message<'_>> {
    sourced(line, kick_fields, |source, (channel, target, reason)| {
        Message::Kick {
            source,
            channel,
            target,
            reason,
        }
    })
}
