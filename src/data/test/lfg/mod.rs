use crate::{
    data::lfg::{LfgRepository, SaveReport},
    model::lfg::record::LfgRecord,
};
use chrono::TimeZone;
use chrono_tz::UTC;
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use serenity::all::{GuildId, UserId};
use test_utils::{builder::TestBuilder, factory};

mod dump;
mod ensure_table;
mod get_all;
mod save_all;

/// Record with a fixed start time and a one-member roster.
fn record(id: i32, name: &str) -> LfgRecord {
    LfgRecord {
        id,
        name: name.to_string(),
        description: "Bring potions".to_string(),
        game: "Destiny 2".to_string(),
        scheduled_at: UTC.with_ymd_and_hms(2030, 1, 1, 20, 0, 0).unwrap(),
        guild_id: GuildId::new(factory::lfg::DEFAULT_GUILD_ID),
        owner_id: UserId::new(factory::lfg::DEFAULT_OWNER_ID),
        participants: vec![UserId::new(factory::lfg::DEFAULT_OWNER_ID)],
        alternatives: Vec::new(),
    }
}
