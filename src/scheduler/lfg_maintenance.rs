use dioxus_logger::tracing;
use std::path::PathBuf;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, service::lfg::registry::LfgRegistry};

/// Hourly on the hour.
const SAVE_SCHEDULE: &str = "0 0 * * * *";
/// Hourly at half past.
const BACKUP_SCHEDULE: &str = "0 30 * * * *";

/// Starts the LFG maintenance scheduler
///
/// Runs two hourly jobs:
/// - Save every in-memory LFG to the store
/// - Overwrite the backup artifact with a full reconstruction script
///
/// Failures are logged and the job runs again next hour.
///
/// # Arguments
/// - `registry`: The LFG registry to persist
/// - `backup_path`: Where the backup script is written
///
/// # Returns
/// - `Ok(JobScheduler)` - Running scheduler; shut it down on exit
/// - `Err(AppError::SchedulerErr)` - A job could not be created or the scheduler failed to start
pub async fn start_scheduler(
    registry: LfgRegistry,
    backup_path: PathBuf,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let save_registry = registry.clone();
    let save_job = Job::new_async(SAVE_SCHEDULE, move |_uuid, _lock| {
        let registry = save_registry.clone();

        Box::pin(async move {
            if let Err(e) = registry.save_all().await {
                tracing::error!("Error saving LFGs: {}", e);
            }
        })
    })?;

    let backup_registry = registry;
    let backup_job = Job::new_async(BACKUP_SCHEDULE, move |_uuid, _lock| {
        let registry = backup_registry.clone();
        let path = backup_path.clone();

        Box::pin(async move {
            if let Err(e) = registry.backup_all(&path).await {
                tracing::error!("Error writing LFG backup: {}", e);
            }
        })
    })?;

    scheduler.add(save_job).await?;
    scheduler.add(backup_job).await?;
    scheduler.start().await?;

    tracing::info!("LFG maintenance scheduler started");

    Ok(scheduler)
}
