//! Looking-for-group events.
//!
//! An [`Lfg`] owns its roster and at most one pending alert. Roster operations keep the
//! participant and alternative lists disjoint; rescheduling goes through
//! [`Lfg::update`], which cancels the stale alert before the caller arms a new one.

pub mod record;
pub mod summary;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serenity::all::UserId;
use std::time::Duration;

use crate::{
    error::lfg::LfgError,
    model::discord::{GuildRef, RosterMember},
    scheduler::deferred::DeferredTask,
    util::time_text,
};

use self::{
    record::LfgRecord,
    summary::{LfgAlert, LfgListing, LfgSummary},
};

/// The replaceable fields of an LFG.
#[derive(Debug, Clone, PartialEq)]
pub struct LfgDetails {
    pub name: String,
    pub description: String,
    pub game: String,
    pub scheduled_at: DateTime<Tz>,
}

/// Parameters for creating an LFG from command input.
#[derive(Debug, Clone)]
pub struct CreateLfgParams {
    pub name: String,
    pub description: String,
    pub game: String,
    /// Start time as `[zone:]YYYY-MM-DD:HH-MM`.
    pub time_text: String,
    pub guild: GuildRef,
    /// The member issuing the command, auto-joined as first participant.
    pub owner: RosterMember,
}

/// What `schedule` should do for the current start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPlan {
    /// Less than the lead time remains; alert participants right away.
    FireNow,
    /// Arm a deferred alert after this delay.
    Arm(Duration),
}

/// Changes broadcast to UI layers that render LFG summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LfgEvent {
    Created(i32),
    RosterChanged(i32),
    Updated(i32),
    Deleted(i32),
    AlertSent(i32),
}

/// One scheduled group event with its roster.
pub struct Lfg {
    id: i32,
    /// Registry-unique instance number; distinguishes an LFG from a later one reusing its id.
    serial: u64,
    details: LfgDetails,
    guild: GuildRef,
    owner: RosterMember,
    participants: Vec<RosterMember>,
    alternatives: Vec<RosterMember>,
    pending_alert: Option<DeferredTask<()>>,
    /// Bumped when an alert is armed and again when it fires; stale alerts compare against it.
    alert_generation: u64,
    /// Bumped by `update`; edit prompts compare against it.
    details_revision: u64,
}

impl Lfg {
    /// Creates an LFG with empty rosters and no alert.
    ///
    /// The owner is not joined; the command layer does that explicitly.
    pub fn new(id: i32, serial: u64, details: LfgDetails, guild: GuildRef, owner: RosterMember) -> Self {
        Self {
            id,
            serial,
            details,
            guild,
            owner,
            participants: Vec::new(),
            alternatives: Vec::new(),
            pending_alert: None,
            alert_generation: 0,
            details_revision: 0,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn details(&self) -> &LfgDetails {
        &self.details
    }

    pub fn guild(&self) -> &GuildRef {
        &self.guild
    }

    pub fn owner(&self) -> &RosterMember {
        &self.owner
    }

    pub fn participants(&self) -> &[RosterMember] {
        &self.participants
    }

    pub fn alternatives(&self) -> &[RosterMember] {
        &self.alternatives
    }

    pub fn details_revision(&self) -> u64 {
        self.details_revision
    }

    pub fn alert_generation(&self) -> u64 {
        self.alert_generation
    }

    pub fn pending_alert(&self) -> Option<&DeferredTask<()>> {
        self.pending_alert.as_ref()
    }

    pub fn is_participant(&self, user: UserId) -> bool {
        self.participants.iter().any(|m| m.id == user)
    }

    pub fn is_alternative(&self, user: UserId) -> bool {
        self.alternatives.iter().any(|m| m.id == user)
    }

    /// Adds a member to the participants, moving them out of the alternatives.
    ///
    /// # Returns
    /// - `Ok(())` - Member is now a participant
    /// - `Err(LfgError::AlreadyJoined)` - Member was already a participant; nothing changed
    pub fn join(&mut self, member: RosterMember) -> Result<(), LfgError> {
        if self.is_participant(member.id) {
            return Err(LfgError::AlreadyJoined);
        }
        self.alternatives.retain(|m| m.id != member.id);
        self.participants.push(member);
        Ok(())
    }

    /// Adds a member to the alternatives, moving them out of the participants.
    ///
    /// # Returns
    /// - `Ok(())` - Member is now an alternative
    /// - `Err(LfgError::AlreadyAlternative)` - Member was already an alternative; nothing changed
    pub fn join_as_alternative(&mut self, member: RosterMember) -> Result<(), LfgError> {
        if self.is_alternative(member.id) {
            return Err(LfgError::AlreadyAlternative);
        }
        self.participants.retain(|m| m.id != member.id);
        self.alternatives.push(member);
        Ok(())
    }

    /// Removes a member from whichever roster holds them.
    ///
    /// # Returns
    /// - `Ok(())` - Member removed
    /// - `Err(LfgError::NotJoined)` - Member was in neither roster
    pub fn leave(&mut self, user: UserId) -> Result<(), LfgError> {
        if let Some(index) = self.participants.iter().position(|m| m.id == user) {
            self.participants.remove(index);
        } else if let Some(index) = self.alternatives.iter().position(|m| m.id == user) {
            self.alternatives.remove(index);
        } else {
            return Err(LfgError::NotJoined);
        }
        Ok(())
    }

    /// Replaces name, description, game and start time and cancels the pending alert.
    ///
    /// The caller must schedule again before releasing the LFG.
    pub fn update(&mut self, details: LfgDetails) {
        self.details = details;
        self.details_revision += 1;
        self.cancel_alert("lfg rescheduled");
    }

    /// Decides how to alert for the current start time.
    ///
    /// # Arguments
    /// - `now` - Current instant
    /// - `lead_seconds` - Alert lead time; closer starts fire immediately
    ///
    /// # Returns
    /// - `AlertPlan::FireNow` - Fewer than `lead_seconds` remain (including past starts)
    /// - `AlertPlan::Arm(delay)` - Alert `lead_seconds` before the start
    pub fn plan_alert(&self, now: DateTime<Utc>, lead_seconds: u64) -> AlertPlan {
        let seconds_left = time_text::seconds_until(&self.details.scheduled_at, now);
        let lead = i64::try_from(lead_seconds).unwrap_or(i64::MAX);

        if seconds_left < lead {
            AlertPlan::FireNow
        } else {
            AlertPlan::Arm(Duration::from_secs((seconds_left - lead) as u64))
        }
    }

    /// Invalidates any previous alert and returns the generation for the next one.
    pub fn next_alert_generation(&mut self) -> u64 {
        self.cancel_alert("alert replaced");
        self.alert_generation += 1;
        self.alert_generation
    }

    /// Consumes the current generation so the same alert cannot be delivered twice.
    pub fn mark_alert_fired(&mut self) {
        self.alert_generation += 1;
    }

    /// Stores the armed alert for the generation returned by `next_alert_generation`.
    pub fn set_pending_alert(&mut self, task: DeferredTask<()>) {
        if let Some(previous) = self.pending_alert.replace(task) {
            previous.cancel("alert replaced");
        }
    }

    /// Cancels and drops the pending alert, if any.
    ///
    /// # Returns
    /// - `true` - A sleeping alert was cancelled before it could run
    /// - `false` - No alert was pending, or it already started
    pub fn cancel_alert(&mut self, reason: &str) -> bool {
        self.pending_alert
            .take()
            .map(|task| task.cancel(reason))
            .unwrap_or(false)
    }

    /// Snapshot of what participants are told when the alert fires.
    pub fn alert(&self) -> LfgAlert {
        LfgAlert {
            lfg_id: self.id,
            name: self.details.name.clone(),
            game: self.details.game.clone(),
            when: time_text::humanize(&self.details.scheduled_at),
            guild_name: self.guild.name.clone(),
            owner_name: self.owner.display_name.clone(),
            participants: display_names(&self.participants),
        }
    }

    /// Snapshot of the LFG for display.
    pub fn summary(&self, now: DateTime<Utc>) -> LfgSummary {
        LfgSummary {
            id: self.id,
            name: self.details.name.clone(),
            description: self.details.description.clone(),
            game: self.details.game.clone(),
            scheduled_at: self.details.scheduled_at,
            when: time_text::humanize(&self.details.scheduled_at),
            starts_in: time_text::humanize_duration(time_text::seconds_until(
                &self.details.scheduled_at,
                now,
            )),
            guild_id: self.guild.id,
            owner: self.owner.display_name.clone(),
            participants: display_names(&self.participants),
            alternatives: display_names(&self.alternatives),
        }
    }

    pub fn listing(&self) -> LfgListing {
        LfgListing {
            id: self.id,
            name: self.details.name.clone(),
        }
    }

    /// Serializes the LFG into its persisted row shape.
    pub fn to_record(&self) -> LfgRecord {
        LfgRecord {
            id: self.id,
            name: self.details.name.clone(),
            description: self.details.description.clone(),
            game: self.details.game.clone(),
            scheduled_at: self.details.scheduled_at,
            guild_id: self.guild.id,
            owner_id: self.owner.id,
            participants: self.participants.iter().map(|m| m.id).collect(),
            alternatives: self.alternatives.iter().map(|m| m.id).collect(),
        }
    }
}

fn display_names(members: &[RosterMember]) -> Vec<String> {
    members.iter().map(|m| m.display_name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use chrono_tz::UTC;
    use serenity::all::GuildId;

    fn member(id: u64) -> RosterMember {
        RosterMember::new(UserId::new(id), format!("member-{}", id))
    }

    fn lfg_starting_at(scheduled_at: DateTime<Tz>) -> Lfg {
        Lfg::new(
            0,
            1,
            LfgDetails {
                name: "Raid night".to_string(),
                description: "Bring potions".to_string(),
                game: "Destiny 2".to_string(),
                scheduled_at,
            },
            GuildRef {
                id: GuildId::new(10),
                name: "Gamepad".to_string(),
            },
            member(1),
        )
    }

    fn lfg() -> Lfg {
        lfg_starting_at(UTC.with_ymd_and_hms(2030, 1, 1, 20, 0, 0).unwrap())
    }

    #[test]
    fn join_moves_member_out_of_alternatives() {
        let mut lfg = lfg();
        lfg.join_as_alternative(member(2)).unwrap();

        lfg.join(member(2)).unwrap();

        assert!(lfg.is_participant(UserId::new(2)));
        assert!(!lfg.is_alternative(UserId::new(2)));
    }

    #[test]
    fn join_as_alternative_moves_member_out_of_participants() {
        let mut lfg = lfg();
        lfg.join(member(2)).unwrap();

        lfg.join_as_alternative(member(2)).unwrap();

        assert!(lfg.is_alternative(UserId::new(2)));
        assert!(!lfg.is_participant(UserId::new(2)));
    }

    #[test]
    fn duplicate_join_fails_without_change() {
        let mut lfg = lfg();
        lfg.join(member(2)).unwrap();
        lfg.join(member(3)).unwrap();

        assert_eq!(lfg.join(member(2)), Err(LfgError::AlreadyJoined));
        assert_eq!(
            lfg.participants().iter().map(|m| m.id.get()).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert!(lfg.alternatives().is_empty());
    }

    #[test]
    fn duplicate_alternative_fails_without_change() {
        let mut lfg = lfg();
        lfg.join_as_alternative(member(4)).unwrap();

        assert_eq!(
            lfg.join_as_alternative(member(4)),
            Err(LfgError::AlreadyAlternative)
        );
        assert_eq!(lfg.alternatives().len(), 1);
    }

    #[test]
    fn leave_removes_from_either_roster() {
        let mut lfg = lfg();
        lfg.join(member(2)).unwrap();
        lfg.join_as_alternative(member(3)).unwrap();

        lfg.leave(UserId::new(2)).unwrap();
        lfg.leave(UserId::new(3)).unwrap();

        assert!(lfg.participants().is_empty());
        assert!(lfg.alternatives().is_empty());
    }

    #[test]
    fn leave_unknown_member_fails() {
        let mut lfg = lfg();
        lfg.join(member(2)).unwrap();

        assert_eq!(lfg.leave(UserId::new(9)), Err(LfgError::NotJoined));
        assert_eq!(lfg.participants().len(), 1);
    }

    #[test]
    fn plans_deferred_alert_outside_lead_window() {
        let now = Utc::now();
        let lfg = lfg_starting_at((now + TimeDelta::seconds(700)).with_timezone(&UTC));

        // Floor of a sub-second remainder may shave one second
        match lfg.plan_alert(now, 600) {
            AlertPlan::Arm(delay) => assert!((99..=100).contains(&delay.as_secs())),
            plan => panic!("expected Arm, got {:?}", plan),
        }
    }

    #[test]
    fn plans_immediate_alert_inside_lead_window() {
        let now = Utc::now();
        let soon = lfg_starting_at((now + TimeDelta::seconds(300)).with_timezone(&UTC));
        let past = lfg_starting_at((now - TimeDelta::seconds(300)).with_timezone(&UTC));

        assert_eq!(soon.plan_alert(now, 600), AlertPlan::FireNow);
        assert_eq!(past.plan_alert(now, 600), AlertPlan::FireNow);
    }

    #[test]
    fn update_replaces_details_and_bumps_revision() {
        let mut lfg = lfg();
        let details = LfgDetails {
            name: "Dungeon".to_string(),
            description: "Warlocks only".to_string(),
            game: "Destiny 2".to_string(),
            scheduled_at: UTC.with_ymd_and_hms(2031, 5, 5, 18, 0, 0).unwrap(),
        };

        lfg.update(details.clone());

        assert_eq!(lfg.details(), &details);
        assert_eq!(lfg.details_revision(), 1);
    }

    #[test]
    fn to_record_keeps_roster_order() {
        let mut lfg = lfg();
        lfg.join(member(5)).unwrap();
        lfg.join(member(3)).unwrap();
        lfg.join_as_alternative(member(7)).unwrap();

        let record = lfg.to_record();

        assert_eq!(record.participants, vec![UserId::new(5), UserId::new(3)]);
        assert_eq!(record.alternatives, vec![UserId::new(7)]);
        assert_eq!(record.owner_id, UserId::new(1));
        assert_eq!(record.guild_id, GuildId::new(10));
    }
}
