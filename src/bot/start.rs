use dioxus_logger::tracing;
use serenity::all::{Client, GatewayIntents};

use crate::{bot::handler::Handler, config::Config, error::AppError};

/// Builds the Discord client without connecting.
///
/// The client's cache and HTTP handles are available immediately, so the member directory
/// and notifier can be built from them before the gateway connection is started.
///
/// # Arguments
/// - `config` - Application configuration containing the bot token
///
/// # Returns
/// - `Ok(Client)` - Client ready to be started with `start_bot`
/// - `Err(AppError::DiscordErr)` - The client could not be built
pub async fn init_bot(config: &Config) -> Result<Client, AppError> {
    // GUILD_MEMBERS is a privileged intent - must be enabled in Discord Developer Portal
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(Handler)
        .await?;

    Ok(client)
}

/// Connects to the gateway and processes events until the shards shut down.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
