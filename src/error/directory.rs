use serenity::all::{GuildId, UserId};
use thiserror::Error;

/// A stored Discord reference that can no longer be resolved.
///
/// Raised while restoring LFGs from the store. The registry skips the affected row
/// with a warning instead of aborting the whole load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The bot can neither see the guild in its cache nor fetch it.
    #[error("Guild {0} could not be found")]
    GuildNotFound(GuildId),

    /// The member left the guild or the fetch failed.
    #[error("Member {user} could not be found in guild {guild}")]
    MemberNotFound {
        /// Guild the member was looked up in
        guild: GuildId,
        /// The unresolved member
        user: UserId,
    },
}
