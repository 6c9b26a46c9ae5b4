use chrono::Utc;
use chrono_tz::Tz;
use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;
use serenity::all::{GuildId, UserId};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, Mutex};

use crate::{
    config::LIST_LIMIT,
    data::lfg::{LfgRepository, SaveReport},
    error::{lfg::LfgError, AppError},
    model::{
        discord::{GuildRef, RosterMember},
        lfg::{
            summary::{LfgAlert, LfgListing, LfgSummary},
            AlertPlan, Lfg, LfgDetails, LfgEvent,
        },
    },
    scheduler::deferred::{DeferredTask, TaskState},
    service::{
        discord::{MemberDirectory, MemberNotifier},
        lfg::restore::{resolve_row, RestoredLfg},
    },
};

/// Capacity of the event feed; slow subscribers see `Lagged` rather than blocking writers.
const EVENT_CAPACITY: usize = 64;

/// Identifies one armed alert. Stale tickets are dropped when they fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct AlertTicket {
    pub id: i32,
    pub serial: u64,
    pub generation: u64,
}

/// Identity of an LFG captured before a multi-step edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditToken {
    pub id: i32,
    pub serial: u64,
    pub details_revision: u64,
}

/// Outcome of delivering one alert to a roster.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    /// Participants the notifier failed to reach, in roster order.
    pub failed: Vec<UserId>,
}

/// What `load_all` restored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub restored: usize,
    /// Rows left out because they were corrupt or referenced unresolvable guilds or members.
    pub skipped: usize,
}

struct RegistryState {
    /// Ordered by creation, or by id after a load.
    lfgs: Vec<Lfg>,
    next_serial: u64,
    /// Ids deleted since the last successful save; only these rows are removed from the store.
    deleted: BTreeSet<i32>,
    /// Ids of stored rows the last load could not restore. They stay in the store and
    /// are never reassigned.
    unrestored: BTreeSet<i32>,
}

impl RegistryState {
    fn find(&self, id: i32) -> Option<&Lfg> {
        self.lfgs.iter().find(|lfg| lfg.id() == id)
    }

    fn find_mut(&mut self, id: i32) -> Result<&mut Lfg, LfgError> {
        self.lfgs
            .iter_mut()
            .find(|lfg| lfg.id() == id)
            .ok_or(LfgError::NotFound(id))
    }

    fn next_id(&self) -> i32 {
        self.lfgs
            .iter()
            .map(Lfg::id)
            .chain(self.unrestored.iter().copied())
            .max()
            .map(|max| max + 1)
            .unwrap_or(0)
    }

    fn take_serial(&mut self) -> u64 {
        self.next_serial += 1;
        self.next_serial
    }
}

struct RegistryInner {
    db: DatabaseConnection,
    directory: Arc<dyn MemberDirectory>,
    notifier: Arc<dyn MemberNotifier>,
    state: Mutex<RegistryState>,
    events: broadcast::Sender<LfgEvent>,
    default_zone: Tz,
    lead_seconds: u64,
}

/// The in-memory collection of LFGs and its persistence lifecycle.
///
/// Cloning is cheap; all clones share one collection. Every operation takes the state
/// lock for its in-memory part only: directory lookups, alert delivery, and store I/O
/// run after the lock is released, on snapshots taken while it was held.
#[derive(Clone)]
pub struct LfgRegistry {
    inner: Arc<RegistryInner>,
}

impl LfgRegistry {
    /// Creates an empty registry. Call `load_all` to restore persisted LFGs.
    ///
    /// # Arguments
    /// - `db` - Durable store holding the `lfg` table
    /// - `directory` - Resolves guild and member IDs during restore
    /// - `notifier` - Delivers alerts to participants
    /// - `default_zone` - Zone for start times given without a zone prefix
    /// - `lead_seconds` - How long before the start an alert fires
    pub fn new(
        db: DatabaseConnection,
        directory: Arc<dyn MemberDirectory>,
        notifier: Arc<dyn MemberNotifier>,
        default_zone: Tz,
        lead_seconds: u64,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            inner: Arc::new(RegistryInner {
                db,
                directory,
                notifier,
                state: Mutex::new(RegistryState {
                    lfgs: Vec::new(),
                    next_serial: 0,
                    deleted: BTreeSet::new(),
                    unrestored: BTreeSet::new(),
                }),
                events,
                default_zone,
                lead_seconds,
            }),
        }
    }

    pub fn default_zone(&self) -> Tz {
        self.inner.default_zone
    }

    /// Subscribes to LFG changes, for views that render summaries.
    pub fn subscribe(&self) -> broadcast::Receiver<LfgEvent> {
        self.inner.events.subscribe()
    }

    /// Replaces the in-memory collection with every restorable row of the store.
    ///
    /// Creates the table if missing. Rows that are corrupt or reference a guild or member
    /// that can no longer be resolved are skipped with a warning; they stay in the store
    /// untouched and their ids are not handed out again. Restored LFGs whose start
    /// is still ahead get their alert scheduled again; those already started are kept but
    /// not alerted a second time.
    ///
    /// # Returns
    /// - `Ok(LoadReport)` - Counts of restored and skipped rows
    /// - `Err(AppError::DbErr)` - The table could not be created or read
    pub async fn load_all(&self) -> Result<LoadReport, AppError> {
        let repo = LfgRepository::new(&self.inner.db);
        repo.ensure_table().await?;
        let rows = repo.get_all().await?;

        let mut report = LoadReport::default();
        let mut resolved: Vec<RestoredLfg> = Vec::with_capacity(rows.len());
        let mut unrestored = BTreeSet::new();

        for row in rows {
            let id = row.id;
            match resolve_row(row, self.inner.directory.as_ref(), self.inner.default_zone).await {
                Ok(restored) => resolved.push(restored),
                Err(e) => {
                    tracing::warn!("Skipping stored LFG {}: {}", id, e);
                    unrestored.insert(id);
                    report.skipped += 1;
                }
            }
        }

        let now = Utc::now();
        let fire_now = {
            let mut state = self.inner.state.lock().await;

            for previous in state.lfgs.iter_mut() {
                previous.cancel_alert("registry reloaded");
            }

            let mut lfgs = Vec::with_capacity(resolved.len());
            for restored in resolved {
                let serial = state.take_serial();
                lfgs.push(restored.into_lfg(serial));
            }
            state.lfgs = lfgs;
            state.deleted.clear();
            state.unrestored = unrestored;
            report.restored = state.lfgs.len();

            let mut fire_now = Vec::new();
            for lfg in state.lfgs.iter_mut() {
                if lfg.details().scheduled_at.with_timezone(&Utc) <= now {
                    continue;
                }
                if let Some(ticket) = self.schedule_locked(lfg, now) {
                    fire_now.push(ticket);
                }
            }
            fire_now
        };

        for ticket in fire_now {
            self.fire_alert(ticket).await;
        }

        tracing::info!(
            "Loaded {} LFGs ({} skipped)",
            report.restored,
            report.skipped
        );

        Ok(report)
    }

    /// Adds a new LFG with empty rosters.
    ///
    /// The id is one more than the largest id in memory or held by an unrestored row, or 0
    /// when there are none.
    /// The caller joins the owner and calls `schedule`.
    ///
    /// # Returns
    /// - `i32` - The assigned id
    pub async fn create(&self, details: LfgDetails, guild: GuildRef, owner: RosterMember) -> i32 {
        let id = {
            let mut state = self.inner.state.lock().await;
            let id = state.next_id();
            let serial = state.take_serial();
            state.deleted.remove(&id);
            state.lfgs.push(Lfg::new(id, serial, details, guild, owner));
            id
        };

        tracing::info!("Created LFG {}", id);
        self.publish(LfgEvent::Created(id));

        id
    }

    /// Returns a summary of the LFG, `None` if the id is unknown.
    pub async fn find(&self, id: i32) -> Option<LfgSummary> {
        let state = self.inner.state.lock().await;
        state.find(id).map(|lfg| lfg.summary(Utc::now()))
    }

    /// Removes an LFG from memory and cancels its pending alert.
    ///
    /// The stored row is removed by the next successful `save_all`.
    ///
    /// # Returns
    /// - `Ok(())` - LFG removed
    /// - `Err(LfgError::NotFound)` - Unknown id
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        {
            let mut state = self.inner.state.lock().await;
            let index = state
                .lfgs
                .iter()
                .position(|lfg| lfg.id() == id)
                .ok_or(LfgError::NotFound(id))?;

            let mut lfg = state.lfgs.remove(index);
            lfg.cancel_alert("lfg deleted");
            state.deleted.insert(id);
        }

        tracing::info!("Deleted LFG {}", id);
        self.publish(LfgEvent::Deleted(id));

        Ok(())
    }

    /// Joins `member` as a participant of LFG `id`.
    pub async fn join(&self, id: i32, member: RosterMember) -> Result<(), AppError> {
        self.mutate_roster(id, |lfg| lfg.join(member)).await
    }

    /// Joins `member` as an alternative of LFG `id`.
    pub async fn join_as_alternative(&self, id: i32, member: RosterMember) -> Result<(), AppError> {
        self.mutate_roster(id, |lfg| lfg.join_as_alternative(member))
            .await
    }

    /// Removes `user` from whichever roster of LFG `id` holds them.
    pub async fn leave(&self, id: i32, user: UserId) -> Result<(), AppError> {
        self.mutate_roster(id, |lfg| lfg.leave(user)).await
    }

    async fn mutate_roster(
        &self,
        id: i32,
        change: impl FnOnce(&mut Lfg) -> Result<(), LfgError>,
    ) -> Result<(), AppError> {
        {
            let mut state = self.inner.state.lock().await;
            change(state.find_mut(id)?)?;
        }

        self.publish(LfgEvent::RosterChanged(id));

        Ok(())
    }

    /// Captures the identity of LFG `id` for a later `update_checked`.
    pub async fn edit_token(&self, id: i32) -> Result<EditToken, AppError> {
        let state = self.inner.state.lock().await;
        let lfg = state.find(id).ok_or(LfgError::NotFound(id))?;

        Ok(EditToken {
            id,
            serial: lfg.serial(),
            details_revision: lfg.details_revision(),
        })
    }

    /// Replaces the details of LFG `id` and reschedules its alert.
    pub async fn update(&self, id: i32, details: LfgDetails) -> Result<(), AppError> {
        self.apply_update(id, None, details).await
    }

    /// Like `update`, but only if the LFG is still the one `token` was taken from and
    /// nobody edited it in between.
    ///
    /// # Returns
    /// - `Ok(())` - Details replaced and alert rescheduled
    /// - `Err(LfgError::NotFound)` - The LFG was deleted
    /// - `Err(LfgError::ChangedDuringEdit)` - The id now names another LFG, or the details changed
    pub async fn update_checked(&self, token: EditToken, details: LfgDetails) -> Result<(), AppError> {
        self.apply_update(token.id, Some(token), details).await
    }

    async fn apply_update(
        &self,
        id: i32,
        token: Option<EditToken>,
        details: LfgDetails,
    ) -> Result<(), AppError> {
        let ticket = {
            let mut state = self.inner.state.lock().await;
            let lfg = state.find_mut(id)?;

            if let Some(token) = token {
                if lfg.serial() != token.serial || lfg.details_revision() != token.details_revision {
                    return Err(LfgError::ChangedDuringEdit(id).into());
                }
            }

            lfg.update(details);
            self.schedule_locked(lfg, Utc::now())
        };

        tracing::info!("Updated LFG {}", id);
        self.publish(LfgEvent::Updated(id));

        if let Some(ticket) = ticket {
            self.fire_alert(ticket).await;
        }

        Ok(())
    }

    /// Arms the alert for LFG `id`, or alerts right away when its start is within the
    /// lead time. Any previously armed alert is cancelled first.
    pub async fn schedule(&self, id: i32) -> Result<(), AppError> {
        let ticket = {
            let mut state = self.inner.state.lock().await;
            let lfg = state.find_mut(id)?;
            self.schedule_locked(lfg, Utc::now())
        };

        if let Some(ticket) = ticket {
            self.fire_alert(ticket).await;
        }

        Ok(())
    }

    /// Starts a new alert generation for `lfg` and arms it.
    ///
    /// # Returns
    /// - `Some(AlertTicket)` - The alert is due now; the caller fires it after unlocking
    /// - `None` - A deferred alert was armed
    fn schedule_locked(&self, lfg: &mut Lfg, now: chrono::DateTime<Utc>) -> Option<AlertTicket> {
        let ticket = AlertTicket {
            id: lfg.id(),
            serial: lfg.serial(),
            generation: lfg.next_alert_generation(),
        };

        match lfg.plan_alert(now, self.inner.lead_seconds) {
            AlertPlan::FireNow => Some(ticket),
            AlertPlan::Arm(delay) => {
                tracing::debug!("Alert for LFG {} armed in {:?}", ticket.id, delay);

                let registry: Weak<RegistryInner> = Arc::downgrade(&self.inner);
                lfg.set_pending_alert(DeferredTask::arm(delay, move || async move {
                    if let Some(inner) = registry.upgrade() {
                        LfgRegistry { inner }.fire_alert(ticket).await;
                    }
                }));
                None
            }
        }
    }

    /// Delivers the alert described by `ticket` if it is still current.
    ///
    /// # Returns
    /// - `Some(DeliveryReport)` - The alert was delivered to the current participants
    /// - `None` - The LFG was deleted, replaced, or rescheduled since the ticket was issued,
    ///   or the ticket already fired
    pub(super) async fn fire_alert(&self, ticket: AlertTicket) -> Option<DeliveryReport> {
        let (alert, recipients) = {
            let mut state = self.inner.state.lock().await;
            let lfg = state.lfgs.iter_mut().find(|lfg| {
                lfg.id() == ticket.id
                    && lfg.serial() == ticket.serial
                    && lfg.alert_generation() == ticket.generation
            });

            match lfg {
                Some(lfg) => {
                    lfg.mark_alert_fired();
                    (lfg.alert(), participant_ids(lfg))
                }
                None => {
                    tracing::debug!("Dropping stale alert for LFG {}", ticket.id);
                    return None;
                }
            }
        };

        let report = self.deliver(&alert, &recipients).await;
        self.publish(LfgEvent::AlertSent(ticket.id));

        Some(report)
    }

    /// Notifies every current participant of LFG `id`.
    ///
    /// # Returns
    /// - `Ok(DeliveryReport)` - Deliveries attempted; individual failures are in the report
    /// - `Err(LfgError::NotFound)` - Unknown id
    pub async fn alert_members(&self, id: i32) -> Result<DeliveryReport, AppError> {
        let (alert, recipients) = {
            let state = self.inner.state.lock().await;
            let lfg = state.find(id).ok_or(LfgError::NotFound(id))?;
            (lfg.alert(), participant_ids(lfg))
        };

        Ok(self.deliver(&alert, &recipients).await)
    }

    /// Sends `alert` to each recipient in turn; a failed delivery does not stop the rest.
    async fn deliver(&self, alert: &LfgAlert, recipients: &[UserId]) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for user_id in recipients {
            match self.inner.notifier.notify(*user_id, alert).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to alert member {} of LFG {}: {}",
                        user_id,
                        alert.lfg_id,
                        e
                    );
                    report.failed.push(*user_id);
                }
            }
        }

        tracing::info!(
            "Alert for LFG {} delivered to {}/{} participants",
            alert.lfg_id,
            report.delivered,
            recipients.len()
        );

        report
    }

    /// Writes the whole collection to the store and removes rows of deleted LFGs.
    ///
    /// Rows and deleted ids are snapshotted under the lock and written after it is
    /// released, so changes made during the write land in the next save. Stored rows the
    /// registry does not hold and did not delete are left alone. An empty collection is
    /// not written, which keeps a failed or skipped load from wiping the table.
    ///
    /// # Returns
    /// - `Ok(Some(SaveReport))` - Snapshot written
    /// - `Ok(None)` - Collection empty; nothing written
    /// - `Err(AppError::DbErr)` - Store error; the transaction was rolled back and the
    ///   deleted ids are kept for the next save
    pub async fn save_all(&self) -> Result<Option<SaveReport>, AppError> {
        let (records, deleted): (Vec<_>, Vec<i32>) = {
            let state = self.inner.state.lock().await;
            (
                state.lfgs.iter().map(Lfg::to_record).collect(),
                state.deleted.iter().copied().collect(),
            )
        };

        if records.is_empty() {
            tracing::info!("No LFGs in memory, skipping save");
            return Ok(None);
        }

        let report = LfgRepository::new(&self.inner.db)
            .save_all(records, deleted.clone())
            .await?;

        {
            let mut state = self.inner.state.lock().await;
            for id in &deleted {
                state.deleted.remove(id);
            }
        }

        tracing::info!(
            "Saved LFGs: {} inserted, {} updated, {} removed",
            report.inserted,
            report.updated,
            report.removed
        );

        Ok(Some(report))
    }

    /// Overwrites `path` with a script that rebuilds the store.
    pub async fn backup_all(&self, path: &Path) -> Result<(), AppError> {
        let script = LfgRepository::new(&self.inner.db).dump().await?;
        tokio::fs::write(path, script).await?;

        tracing::info!("Wrote LFG backup to {}", path.display());

        Ok(())
    }

    /// The most recent LFGs of `guild`, optionally only those owned by `owner`.
    ///
    /// # Returns
    /// - At most `LIST_LIMIT` entries: the tail of the collection order, oldest first
    pub async fn list(&self, guild: GuildId, owner: Option<UserId>) -> Vec<LfgListing> {
        let state = self.inner.state.lock().await;

        let matching: Vec<LfgListing> = state
            .lfgs
            .iter()
            .filter(|lfg| lfg.guild().id == guild)
            .filter(|lfg| owner.map_or(true, |owner| lfg.owner().id == owner))
            .map(Lfg::listing)
            .collect();

        let skip = matching.len().saturating_sub(LIST_LIMIT);
        matching.into_iter().skip(skip).collect()
    }

    /// State of the pending alert of LFG `id`, `None` when none is held.
    pub async fn alert_state(&self, id: i32) -> Result<Option<TaskState>, AppError> {
        let state = self.inner.state.lock().await;
        let lfg = state.find(id).ok_or(LfgError::NotFound(id))?;

        Ok(lfg.pending_alert().map(DeferredTask::state))
    }

    /// IDs of all LFGs in collection order.
    pub async fn ids(&self) -> Vec<i32> {
        let state = self.inner.state.lock().await;
        state.lfgs.iter().map(Lfg::id).collect()
    }

    fn publish(&self, event: LfgEvent) {
        // No subscribers is not an error
        let _ = self.inner.events.send(event);
    }
}

fn participant_ids(lfg: &Lfg) -> Vec<UserId> {
    lfg.participants().iter().map(|member| member.id).collect()
}
