//! Mapping between LFGs and rows of the `lfg` table.
//!
//! [`LfgRecord`] is the explicit schema struct: every column is typed, and conversion
//! from an entity model rejects rows that break the table contract instead of guessing.

use chrono::DateTime;
use chrono_tz::Tz;
use sea_orm::ActiveValue;
use serenity::all::{GuildId, UserId};
use std::num::NonZeroU64;

use crate::{error::lfg::LfgError, util::time_text};

/// Typed contents of one `lfg` row, with Discord references left unresolved.
#[derive(Debug, Clone, PartialEq)]
pub struct LfgRecord {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub game: String,
    pub scheduled_at: DateTime<Tz>,
    pub guild_id: GuildId,
    pub owner_id: UserId,
    pub participants: Vec<UserId>,
    pub alternatives: Vec<UserId>,
}

impl LfgRecord {
    /// Converts an entity model to a record at the repository boundary.
    ///
    /// NULL description/game are read as empty text and NULL rosters as empty lists.
    /// Start time, guild and owner are required.
    ///
    /// # Arguments
    /// - `entity` - The row as loaded by SeaORM
    /// - `default_zone` - Zone for legacy start times stored without a zone prefix
    ///
    /// # Returns
    /// - `Ok(LfgRecord)` - The typed row
    /// - `Err(LfgError::CorruptRow)` - Negative id, missing or malformed column
    pub fn from_entity(entity: entity::lfg::Model, default_zone: Tz) -> Result<Self, LfgError> {
        let id = entity.id;
        let corrupt = |reason: String| LfgError::CorruptRow { id, reason };

        if id < 0 {
            return Err(corrupt("negative id".to_string()));
        }

        let datetime = entity
            .datetime
            .ok_or_else(|| corrupt("missing datetime".to_string()))?;
        let scheduled_at = time_text::parse(&datetime, default_zone)
            .map_err(|e| corrupt(format!("datetime '{}': {}", datetime, e)))?;

        let guild_id = entity
            .guild
            .and_then(snowflake)
            .map(GuildId::from)
            .ok_or_else(|| corrupt(format!("invalid guild {:?}", entity.guild)))?;
        let owner_id = entity
            .owner
            .and_then(snowflake)
            .map(UserId::from)
            .ok_or_else(|| corrupt(format!("invalid owner {:?}", entity.owner)))?;

        let participants = parse_id_list(entity.participants.as_deref().unwrap_or(""))
            .map_err(|e| corrupt(format!("participants: {}", e)))?;
        let alternatives = parse_id_list(entity.alternatives.as_deref().unwrap_or(""))
            .map_err(|e| corrupt(format!("alternatives: {}", e)))?;

        Ok(Self {
            id,
            name: entity.name,
            description: entity.description.unwrap_or_default(),
            game: entity.game.unwrap_or_default(),
            scheduled_at,
            guild_id,
            owner_id,
            participants,
            alternatives,
        })
    }

    /// Converts the record to an active model with every column set.
    pub fn into_active_model(self) -> entity::lfg::ActiveModel {
        entity::lfg::ActiveModel {
            id: ActiveValue::Set(self.id),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(Some(self.description)),
            game: ActiveValue::Set(Some(self.game)),
            datetime: ActiveValue::Set(Some(time_text::format(&self.scheduled_at))),
            guild: ActiveValue::Set(Some(self.guild_id.get() as i64)),
            owner: ActiveValue::Set(Some(self.owner_id.get() as i64)),
            participants: ActiveValue::Set(Some(join_id_list(&self.participants))),
            alternatives: ActiveValue::Set(Some(join_id_list(&self.alternatives))),
        }
    }
}

/// Joins user IDs as comma-separated decimals, empty string for an empty list.
pub fn join_id_list(ids: &[UserId]) -> String {
    ids.iter()
        .map(|id| id.get().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses comma-separated decimal user IDs; the empty string is an empty list.
pub fn parse_id_list(raw: &str) -> Result<Vec<UserId>, String> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<NonZeroU64>()
                .map(UserId::from)
                .map_err(|_| format!("'{}' is not a user id", part))
        })
        .collect()
}

/// Discord snowflakes are stored as signed SQLite integers.
fn snowflake(value: i64) -> Option<NonZeroU64> {
    u64::try_from(value).ok().and_then(NonZeroU64::new)
}
