//! LFG factory for creating test `lfg` rows.

use crate::factory::helpers::{join_ids, next_id};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Guild ID used by factory rows unless overridden.
pub const DEFAULT_GUILD_ID: u64 = 900_000_000_000_000_001;

/// Owner ID used by factory rows unless overridden.
pub const DEFAULT_OWNER_ID: u64 = 100_000_000_000_000_001;

/// Factory for creating test `lfg` rows with customizable fields.
///
/// Defaults:
/// - name: `"LFG {n}"` where n is auto-incremented
/// - description / game: fixed placeholder text
/// - datetime: `UTC:2099-1-1:20-0`, far enough ahead that restored alerts are armed
/// - guild / owner: [`DEFAULT_GUILD_ID`] / [`DEFAULT_OWNER_ID`]
/// - participants: the owner; alternatives: empty
pub struct LfgFactory<'a> {
    db: &'a DatabaseConnection,
    id: i32,
    name: String,
    description: Option<String>,
    game: Option<String>,
    datetime: Option<String>,
    guild: Option<i64>,
    owner: Option<i64>,
    participants: String,
    alternatives: String,
}

impl<'a> LfgFactory<'a> {
    /// Creates a new LfgFactory with default values for row `id`.
    pub fn new(db: &'a DatabaseConnection, id: i32) -> Self {
        Self {
            db,
            id,
            name: format!("LFG {}", next_id()),
            description: Some("Test lfg description".to_string()),
            game: Some("Test game".to_string()),
            datetime: Some("UTC:2099-1-1:20-0".to_string()),
            guild: Some(DEFAULT_GUILD_ID as i64),
            owner: Some(DEFAULT_OWNER_ID as i64),
            participants: DEFAULT_OWNER_ID.to_string(),
            alternatives: String::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn game(mut self, game: impl Into<String>) -> Self {
        self.game = Some(game.into());
        self
    }

    /// Sets the raw `datetime` column, `None` stores NULL.
    pub fn datetime(mut self, datetime: Option<&str>) -> Self {
        self.datetime = datetime.map(str::to_string);
        self
    }

    pub fn guild(mut self, guild: u64) -> Self {
        self.guild = Some(guild as i64);
        self
    }

    pub fn owner(mut self, owner: u64) -> Self {
        self.owner = Some(owner as i64);
        self
    }

    pub fn participants(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.participants = join_ids(&ids.into_iter().collect::<Vec<_>>());
        self
    }

    pub fn alternatives(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.alternatives = join_ids(&ids.into_iter().collect::<Vec<_>>());
        self
    }

    /// Sets the raw participants column, bypassing ID formatting.
    pub fn raw_participants(mut self, raw: impl Into<String>) -> Self {
        self.participants = raw.into();
        self
    }

    /// Inserts the row into the database.
    ///
    /// # Returns
    /// - `Ok(Model)` - The inserted row
    /// - `Err(DbErr)` - Database error during insertion
    pub async fn build(self) -> Result<entity::lfg::Model, DbErr> {
        entity::lfg::ActiveModel {
            id: ActiveValue::Set(self.id),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(self.description),
            game: ActiveValue::Set(self.game),
            datetime: ActiveValue::Set(self.datetime),
            guild: ActiveValue::Set(self.guild),
            owner: ActiveValue::Set(self.owner),
            participants: ActiveValue::Set(Some(self.participants)),
            alternatives: ActiveValue::Set(Some(self.alternatives)),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an `lfg` row with default values.
pub async fn create_lfg(db: &DatabaseConnection, id: i32) -> Result<entity::lfg::Model, DbErr> {
    LfgFactory::new(db, id).build().await
}
