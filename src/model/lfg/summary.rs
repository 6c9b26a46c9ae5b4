//! Read-only snapshots of LFGs handed to callers outside the registry.

use chrono::DateTime;
use chrono_tz::Tz;
use serenity::all::GuildId;

/// Everything a summary view shows for one LFG.
#[derive(Debug, Clone, PartialEq)]
pub struct LfgSummary {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub game: String,
    pub scheduled_at: DateTime<Tz>,
    /// Long-form local start time.
    pub when: String,
    /// Relative start time at the moment the summary was taken.
    pub starts_in: String,
    pub guild_id: GuildId,
    /// Owner display name.
    pub owner: String,
    /// Participant display names in join order.
    pub participants: Vec<String>,
    /// Alternative display names in join order.
    pub alternatives: Vec<String>,
}

/// One line of a list command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LfgListing {
    pub id: i32,
    pub name: String,
}

/// Payload delivered to each participant when the alert fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LfgAlert {
    pub lfg_id: i32,
    pub name: String,
    pub game: String,
    pub when: String,
    pub guild_name: String,
    pub owner_name: String,
    pub participants: Vec<String>,
}
