//! Rebuilding LFGs from stored rows.

use chrono_tz::Tz;
use dioxus_logger::tracing;

use crate::{
    error::AppError,
    model::{
        discord::{GuildRef, RosterMember},
        lfg::{record::LfgRecord, Lfg, LfgDetails},
    },
    service::discord::MemberDirectory,
};

/// A stored row with every Discord reference resolved, ready to become an [`Lfg`].
pub(super) struct RestoredLfg {
    record: LfgRecord,
    guild: GuildRef,
    owner: RosterMember,
    participants: Vec<RosterMember>,
    alternatives: Vec<RosterMember>,
}

/// Maps a row and resolves its guild, owner and roster through the directory.
///
/// # Returns
/// - `Ok(RestoredLfg)` - All references resolved
/// - `Err(AppError::LfgErr)` - The row is corrupt
/// - `Err(AppError::ResolutionErr)` - The guild or one of the members is gone
pub(super) async fn resolve_row(
    row: entity::lfg::Model,
    directory: &dyn MemberDirectory,
    default_zone: Tz,
) -> Result<RestoredLfg, AppError> {
    let record = LfgRecord::from_entity(row, default_zone)?;

    let guild = directory.resolve_guild(record.guild_id).await?;
    let owner = directory
        .resolve_member(record.guild_id, record.owner_id)
        .await?;

    let mut participants = Vec::with_capacity(record.participants.len());
    for user_id in &record.participants {
        participants.push(directory.resolve_member(record.guild_id, *user_id).await?);
    }

    let mut alternatives = Vec::with_capacity(record.alternatives.len());
    for user_id in &record.alternatives {
        alternatives.push(directory.resolve_member(record.guild_id, *user_id).await?);
    }

    Ok(RestoredLfg {
        record,
        guild,
        owner,
        participants,
        alternatives,
    })
}

impl RestoredLfg {
    /// Builds the LFG, keeping roster order. A member listed twice keeps their first
    /// place; participants win over alternatives.
    pub(super) fn into_lfg(self, serial: u64) -> Lfg {
        let id = self.record.id;
        let mut lfg = Lfg::new(
            id,
            serial,
            LfgDetails {
                name: self.record.name,
                description: self.record.description,
                game: self.record.game,
                scheduled_at: self.record.scheduled_at,
            },
            self.guild,
            self.owner,
        );

        for member in self.participants {
            if let Err(e) = lfg.join(member) {
                tracing::debug!("LFG {}: ignoring duplicate participant ({})", id, e);
            }
        }

        for member in self.alternatives {
            if lfg.is_participant(member.id) {
                tracing::debug!("LFG {}: {} is already a participant", id, member.id);
                continue;
            }
            if let Err(e) = lfg.join_as_alternative(member) {
                tracing::debug!("LFG {}: ignoring duplicate alternative ({})", id, e);
            }
        }

        lfg
    }
}
