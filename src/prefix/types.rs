//! Hostmask types.
//!
//! A channel event's source is written `nick!user@host`. Only this user form
//! is recognized; server-name sources do not classify.

use std::fmt;

/// A borrowed `nick!user@host` source.
///
/// All three parts are slices of the line the source was parsed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hostmask<'a> {
    pub nick: &'a str,
    pub user: &'a str,
    pub host: &'a str,
}

impl<'a> Hostmask<'a> {
    /// Split `s` at the first `!` and the first `@`.
    ///
    /// Returns `None` unless both are present with `!` first. Parts may be
    /// empty.
    ///
    /// ```
    /// use slirc_wire::Hostmask;
    ///
    /// let mask = Hostmask::parse("nick!~user@host.example").unwrap();
    /// assert_eq!(mask.nick, "nick");
    /// assert_eq!(mask.user, "~user");
    /// assert_eq!(mask.host, "host.example");
    /// assert!(Hostmask::parse("irc.example.net").is_none());
    /// ```
    pub fn parse(s: &'a str) -> Option<Self> {
        let bang = s.find('!')?;
        let at = s.find('@')?;
        if at < bang {
            return None;
        }

        Some(Self {
            nick: &s[..bang],
            user: &s[bang + 1..at],
            host: &s[at + 1..],
        })
    }

    pub fn to_owned_hostmask(&self) -> OwnedHostmask {
        OwnedHostmask {
            nick: self.nick.to_string(),
            user: self.user.to_string(),
            host: self.host.to_string(),
        }
    }
}

impl fmt::Display for Hostmask<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}@{}", self.nick, self.user, self.host)
    }
}

/// Owned copy of a [`Hostmask`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnedHostmask {
    pub nick: String,
    pub user: String,
    pub host: String,
}

impl OwnedHostmask {
    pub fn as_hostmask(&self) -> Hostmask<'_> {
        Hostmask {
            nick: &self.nick,
            user: &self.user,
            host: &self.host,
        }
    }
}

impl fmt::Display for OwnedHostmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_hostmask().fmt(f)
    }
}
