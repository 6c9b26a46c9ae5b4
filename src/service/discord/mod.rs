//! Discord-facing collaborators of the LFG registry.
//!
//! The registry depends on these traits only, so it can be driven by serenity in
//! production and by in-memory fakes in tests.

pub mod directory;
pub mod notifier;

use serenity::all::{GuildId, UserId};
use serenity::async_trait;

use crate::{
    error::AppError,
    model::{
        discord::{GuildRef, RosterMember},
        lfg::summary::LfgAlert,
    },
};

/// Resolves stored guild and member IDs to live references.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// # Returns
    /// - `Ok(GuildRef)` - The guild with its current name
    /// - `Err(AppError::ResolutionErr)` - The guild is gone or the bot left it
    async fn resolve_guild(&self, guild_id: GuildId) -> Result<GuildRef, AppError>;

    /// # Returns
    /// - `Ok(RosterMember)` - The member with their current display name
    /// - `Err(AppError::ResolutionErr)` - The user is no longer a member of the guild
    async fn resolve_member(&self, guild_id: GuildId, user_id: UserId)
        -> Result<RosterMember, AppError>;
}

/// Delivers an LFG alert to one member.
#[async_trait]
pub trait MemberNotifier: Send + Sync {
    async fn notify(&self, user_id: UserId, alert: &LfgAlert) -> Result<(), AppError>;
}
