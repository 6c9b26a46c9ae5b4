use dioxus_logger::tracing;
use serenity::all::{GuildId, UserId};
use serenity::async_trait;
use serenity::cache::Cache;
use serenity::http::Http;
use std::sync::Arc;

use crate::{
    error::{directory::ResolutionError, AppError},
    model::discord::{GuildRef, RosterMember},
    service::discord::MemberDirectory,
};

/// Directory backed by the serenity gateway cache with an HTTP fallback.
///
/// The cache only holds guilds and members seen since the gateway connected, so rows
/// restored right after startup usually go through HTTP.
pub struct SerenityDirectory {
    cache: Arc<Cache>,
    http: Arc<Http>,
}

impl SerenityDirectory {
    pub fn new(cache: Arc<Cache>, http: Arc<Http>) -> Self {
        Self { cache, http }
    }
}

#[async_trait]
impl MemberDirectory for SerenityDirectory {
    async fn resolve_guild(&self, guild_id: GuildId) -> Result<GuildRef, AppError> {
        let cached = self.cache.guild(guild_id).map(|guild| guild.name.clone());
        if let Some(name) = cached {
            return Ok(GuildRef { id: guild_id, name });
        }

        match self.http.get_guild(guild_id).await {
            Ok(guild) => Ok(GuildRef {
                id: guild.id,
                name: guild.name,
            }),
            Err(e) => {
                tracing::debug!("Failed to fetch guild {}: {}", guild_id, e);
                Err(ResolutionError::GuildNotFound(guild_id).into())
            }
        }
    }

    async fn resolve_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<RosterMember, AppError> {
        let cached = self.cache.guild(guild_id).and_then(|guild| {
            guild
                .members
                .get(&user_id)
                .map(|member| member.display_name().to_string())
        });
        if let Some(display_name) = cached {
            return Ok(RosterMember::new(user_id, display_name));
        }

        match self.http.get_member(guild_id, user_id).await {
            Ok(member) => Ok(RosterMember::new(member.user.id, member.display_name())),
            Err(e) => {
                tracing::debug!(
                    "Failed to fetch member {} of guild {}: {}",
                    user_id,
                    guild_id,
                    e
                );
                Err(ResolutionError::MemberNotFound {
                    guild: guild_id,
                    user: user_id,
                }
                .into())
            }
        }
    }
}
