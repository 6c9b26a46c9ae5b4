//! Resolved Discord references held by LFGs.

use serenity::all::{GuildId, UserId};

/// A guild an LFG belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRef {
    pub id: GuildId,
    pub name: String,
}

/// A guild member on an LFG roster.
///
/// Two members are the same roster entry when their user IDs match, regardless of
/// the display name captured when they were resolved.
#[derive(Debug, Clone, Eq)]
pub struct RosterMember {
    pub id: UserId,
    pub display_name: String,
}

impl RosterMember {
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

impl PartialEq for RosterMember {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
