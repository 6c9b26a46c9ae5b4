//! In-memory stand-ins for the Discord collaborators.

use serenity::all::{GuildId, UserId};
use serenity::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::{
    error::{directory::ResolutionError, AppError},
    model::{
        discord::{GuildRef, RosterMember},
        lfg::summary::LfgAlert,
    },
    service::discord::{MemberDirectory, MemberNotifier},
};

/// Directory answering from fixed guild and member tables.
#[derive(Default)]
pub struct FakeDirectory {
    guilds: HashMap<GuildId, String>,
    members: HashMap<(GuildId, UserId), String>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guild(mut self, id: u64, name: &str) -> Self {
        self.guilds.insert(GuildId::new(id), name.to_string());
        self
    }

    pub fn member(mut self, guild: u64, user: u64, display_name: &str) -> Self {
        self.members.insert(
            (GuildId::new(guild), UserId::new(user)),
            display_name.to_string(),
        );
        self
    }
}

#[async_trait]
impl MemberDirectory for FakeDirectory {
    async fn resolve_guild(&self, guild_id: GuildId) -> Result<GuildRef, AppError> {
        self.guilds
            .get(&guild_id)
            .map(|name| GuildRef {
                id: guild_id,
                name: name.clone(),
            })
            .ok_or_else(|| ResolutionError::GuildNotFound(guild_id).into())
    }

    async fn resolve_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<RosterMember, AppError> {
        self.members
            .get(&(guild_id, user_id))
            .map(|name| RosterMember::new(user_id, name.clone()))
            .ok_or_else(|| {
                ResolutionError::MemberNotFound {
                    guild: guild_id,
                    user: user_id,
                }
                .into()
            })
    }
}

/// Notifier recording every delivery, failing for members marked unreachable.
#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<(UserId, i32)>>,
    unreachable: Mutex<HashSet<UserId>>,
}

impl FakeNotifier {
    /// Makes deliveries to `user` fail, like a member with direct messages disabled.
    pub fn fail_for(&self, user: u64) {
        self.unreachable.lock().unwrap().insert(UserId::new(user));
    }

    /// Successful deliveries as (recipient, LFG id), in delivery order.
    pub fn sent(&self) -> Vec<(UserId, i32)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MemberNotifier for FakeNotifier {
    async fn notify(&self, user_id: UserId, alert: &LfgAlert) -> Result<(), AppError> {
        if self.unreachable.lock().unwrap().contains(&user_id) {
            return Err(AppError::InternalError(
                "cannot send messages to this user".to_string(),
            ));
        }

        self.sent.lock().unwrap().push((user_id, alert.lfg_id));
        Ok(())
    }
}
