//! IRC message source (`nick!user@host`) types.

mod types;

pub use self::types::{Hostmask, OwnedHostmask};
