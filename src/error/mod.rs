//! Error types and user-facing message mapping.
//!
//! This module provides the application's error hierarchy. `AppError` is the top-level
//! error type wrapping domain-specific errors; `AppError::user_message` turns any of them
//! into the rejection text a command layer shows to the invoking member.

pub mod config;
pub mod directory;
pub mod lfg;
pub mod time_text;

use dioxus_logger::tracing;
use thiserror::Error;

use crate::error::{
    config::ConfigError, directory::ResolutionError, lfg::LfgError, time_text::TimeTextError,
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application. Most variants
/// use `#[from]` for automatic error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// LFG lookup or roster precondition failure.
    #[error(transparent)]
    LfgErr(#[from] LfgError),

    /// Malformed `[zone:]YYYY-MM-DD:HH-MM` input.
    #[error(transparent)]
    TimeTextErr(#[from] TimeTextError),

    /// A stored guild or member could not be resolved through the directory.
    #[error(transparent)]
    ResolutionErr(#[from] ResolutionError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Filesystem error while writing the backup artifact.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// Internal error with custom message.
    ///
    /// The provided message is logged but a generic message is shown to members.
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Converts the error into the message shown to the member who issued a command.
    ///
    /// Recoverable errors (bad time text, unknown LFG, roster preconditions) are described
    /// verbatim. Everything else is logged with full details and replaced by a generic
    /// message to avoid leaking internals into chat.
    ///
    /// # Returns
    /// - `String` - Message suitable for an ephemeral command response
    pub fn user_message(&self) -> String {
        match self {
            Self::LfgErr(err) => err.to_string(),
            Self::TimeTextErr(err) => format!(
                "Invalid date format ({}). Use YYYY-MM-DD:HH-MM, optionally prefixed with a zone like UTC:",
                err
            ),
            Self::DbErr(err) => {
                tracing::error!("Database error surfaced to command: {}", err);
                format!("Saving failed!\n{}", err)
            }
            err => {
                tracing::error!("{}", err);
                "Internal error, please try again later.".to_string()
            }
        }
    }
}
