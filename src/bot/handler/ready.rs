//! Ready event handler for bot initialization.
//!
//! Fired once the bot has authenticated and completed the gateway handshake. Guilds
//! listed here arrive in the cache shortly after through `guild_create` events.

use dioxus_logger::tracing;
use serenity::all::{ActivityData, Context, Ready};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `ctx` - Discord context for setting activity status
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord ({} guilds)",
        ready.user.name,
        ready.guilds.len()
    );

    ctx.set_activity(Some(ActivityData::custom("Looking for group")));
}
