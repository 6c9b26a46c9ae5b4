use serenity::all::{CreateEmbed, CreateEmbedFooter, CreateMessage, UserId};
use serenity::async_trait;
use serenity::http::Http;
use std::sync::Arc;

use crate::{error::AppError, model::lfg::summary::LfgAlert, service::discord::MemberNotifier};

/// Sends LFG alerts as direct-message embeds.
pub struct DirectMessageNotifier {
    http: Arc<Http>,
}

impl DirectMessageNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MemberNotifier for DirectMessageNotifier {
    /// Opens (or reuses) the DM channel with `user_id` and posts the alert embed.
    ///
    /// Fails when the member has direct messages from server members disabled.
    async fn notify(&self, user_id: UserId, alert: &LfgAlert) -> Result<(), AppError> {
        let channel = user_id.create_dm_channel(&self.http).await?;

        let message = CreateMessage::new().embed(build_alert_embed(alert));
        channel.id.send_message(&self.http, message).await?;

        Ok(())
    }
}

/// Builds the alert embed shown to each participant.
pub fn build_alert_embed(alert: &LfgAlert) -> CreateEmbed {
    let participants = if alert.participants.is_empty() {
        "-".to_string()
    } else {
        alert.participants.join(", ")
    };

    CreateEmbed::new()
        .title(format!("{} is about to start", alert.name))
        .color(0x5865F2) // Discord blurple color
        .field("Game", &alert.game, true)
        .field("When", &alert.when, true)
        .field("Host", &alert.owner_name, true)
        .field("Participants", participants, false)
        .footer(CreateEmbedFooter::new(format!(
            "LFG #{} in {}",
            alert.lfg_id, alert.guild_name
        )))
}
