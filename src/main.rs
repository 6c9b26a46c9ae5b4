use dioxus_logger::tracing::{self, Level};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use gamepad_bot::{
    bot,
    config::Config,
    error::AppError,
    scheduler::lfg_maintenance,
    service::{
        discord::{directory::SerenityDirectory, notifier::DirectMessageNotifier},
        lfg::registry::LfgRegistry,
    },
    startup,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    if let Err(e) = dioxus_logger::init(Level::INFO) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let db = startup::connect_to_database(&config).await?;

    tracing::info!("Starting bot");

    let bot_client = bot::start::init_bot(&config).await?;
    let cache = bot_client.cache.clone();
    let http = bot_client.http.clone();
    let shard_manager = bot_client.shard_manager.clone();

    let registry = LfgRegistry::new(
        db,
        Arc::new(SerenityDirectory::new(cache, http.clone())),
        Arc::new(DirectMessageNotifier::new(http)),
        config.default_timezone,
        config.alert_lead_seconds,
    );

    // Start the gateway before restoring so cached members are available to the directory
    tokio::spawn(async move {
        if let Err(e) = bot::start::start_bot(bot_client).await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    let mut events = registry.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::debug!("LFG event: {:?}", event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!("LFG event feed lagged, {} events missed", missed)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    registry.load_all().await?;

    let mut scheduler =
        lfg_maintenance::start_scheduler(registry.clone(), config.backup_path.clone()).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    if let Err(e) = registry.save_all().await {
        tracing::error!("Failed to save LFGs on shutdown: {}", e);
    }

    if let Err(e) = scheduler.shutdown().await {
        tracing::error!("Failed to stop maintenance scheduler: {}", e);
    }
    shard_manager.shutdown_all().await;

    Ok(())
}
