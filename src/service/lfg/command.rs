//! Command surface over the registry.
//!
//! [`LfgService`] is what chat commands call: it parses user input, applies the
//! owner auto-join on create, drives the multi-question edit flow, and returns
//! summaries ready to render.

use serenity::all::{GuildId, UserId};
use serenity::async_trait;

use crate::{
    data::lfg::SaveReport,
    error::{lfg::LfgError, AppError},
    model::{
        discord::RosterMember,
        lfg::{
            summary::{LfgListing, LfgSummary},
            CreateLfgParams, LfgDetails,
        },
    },
    service::lfg::registry::LfgRegistry,
    util::time_text,
};

/// One of the four replacement values collected by `edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditQuestion {
    Name,
    Description,
    Game,
    Time,
}

impl EditQuestion {
    /// Questions in the order `edit` asks them.
    pub const ALL: [EditQuestion; 4] = [
        EditQuestion::Name,
        EditQuestion::Description,
        EditQuestion::Game,
        EditQuestion::Time,
    ];

    pub fn prompt(&self) -> &'static str {
        match self {
            EditQuestion::Name => "New name?",
            EditQuestion::Description => "New description?",
            EditQuestion::Game => "New game?",
            EditQuestion::Time => "New start time? ([zone:]YYYY-MM-DD:HH-MM)",
        }
    }
}

/// Source of answers for the edit flow, typically the invoking member's next messages.
#[async_trait]
pub trait EditPrompt: Send {
    /// Asks one question and waits for the answer.
    async fn ask(&mut self, question: EditQuestion) -> Result<String, AppError>;
}

pub struct LfgService<'a> {
    registry: &'a LfgRegistry,
}

impl<'a> LfgService<'a> {
    pub fn new(registry: &'a LfgRegistry) -> Self {
        Self { registry }
    }

    /// Creates an LFG, joins its owner as first participant, and schedules the alert.
    ///
    /// # Returns
    /// - `Ok(LfgSummary)` - The new LFG
    /// - `Err(AppError::TimeTextErr)` - `time_text` is malformed; nothing was created
    pub async fn create(&self, params: CreateLfgParams) -> Result<LfgSummary, AppError> {
        let scheduled_at = time_text::parse(&params.time_text, self.registry.default_zone())?;

        let owner = params.owner;
        let id = self
            .registry
            .create(
                LfgDetails {
                    name: params.name,
                    description: params.description,
                    game: params.game,
                    scheduled_at,
                },
                params.guild,
                owner.clone(),
            )
            .await;

        self.registry.join(id, owner).await?;
        self.registry.schedule(id).await?;

        self.view(id).await
    }

    /// Collects name, description, game and start time, then applies them.
    ///
    /// The LFG is not locked while the prompt waits. Before applying, the edit checks
    /// that the LFG still exists and was neither replaced nor edited in the meantime.
    ///
    /// # Returns
    /// - `Ok(LfgSummary)` - The updated LFG
    /// - `Err(LfgError::NotFound)` - Unknown id, or deleted while prompting
    /// - `Err(LfgError::ChangedDuringEdit)` - Replaced or edited while prompting
    /// - `Err(AppError::TimeTextErr)` - The time answer is malformed; nothing changed
    pub async fn edit(&self, id: i32, prompt: &mut dyn EditPrompt) -> Result<LfgSummary, AppError> {
        let token = self.registry.edit_token(id).await?;

        let mut answers = Vec::with_capacity(EditQuestion::ALL.len());
        for question in EditQuestion::ALL {
            answers.push(prompt.ask(question).await?);
        }

        let [name, description, game, time]: [String; 4] = answers
            .try_into()
            .map_err(|_| AppError::InternalError("edit prompt answer count".to_string()))?;

        let scheduled_at = time_text::parse(&time, self.registry.default_zone())?;

        self.registry
            .update_checked(
                token,
                LfgDetails {
                    name,
                    description,
                    game,
                    scheduled_at,
                },
            )
            .await?;

        self.view(id).await
    }

    /// Lists the most recent LFGs of a guild, optionally filtered by owner.
    pub async fn list(&self, guild: GuildId, owner: Option<UserId>) -> Vec<LfgListing> {
        self.registry.list(guild, owner).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.registry.delete(id).await
    }

    /// # Returns
    /// - `Ok(LfgSummary)` - Current roster and schedule
    /// - `Err(LfgError::NotFound)` - Unknown id
    pub async fn view(&self, id: i32) -> Result<LfgSummary, AppError> {
        self.registry
            .find(id)
            .await
            .ok_or_else(|| LfgError::NotFound(id).into())
    }

    /// Saves every LFG now; store errors are returned to the caller.
    pub async fn commit(&self) -> Result<Option<SaveReport>, AppError> {
        self.registry.save_all().await
    }

    pub async fn join(&self, id: i32, member: RosterMember) -> Result<LfgSummary, AppError> {
        self.registry.join(id, member).await?;
        self.view(id).await
    }

    pub async fn join_as_alternative(
        &self,
        id: i32,
        member: RosterMember,
    ) -> Result<LfgSummary, AppError> {
        self.registry.join_as_alternative(id, member).await?;
        self.view(id).await
    }

    pub async fn leave(&self, id: i32, user: UserId) -> Result<LfgSummary, AppError> {
        self.registry.leave(id, user).await?;
        self.view(id).await
    }
}
