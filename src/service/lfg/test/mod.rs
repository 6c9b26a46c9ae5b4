use crate::{
    error::{lfg::LfgError, AppError},
    model::{
        discord::{GuildRef, RosterMember},
        lfg::{LfgDetails, LfgEvent},
    },
    scheduler::deferred::TaskState,
    service::lfg::registry::{AlertTicket, LfgRegistry},
};
use chrono::{TimeDelta, Utc};
use chrono_tz::UTC;
use sea_orm::{DbErr, EntityTrait};
use serenity::all::{GuildId, UserId};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{builder::TestBuilder, context::TestContext, factory};

use self::fakes::{FakeDirectory, FakeNotifier};

mod alert;
mod fakes;

const GUILD: u64 = factory::lfg::DEFAULT_GUILD_ID;
const OTHER_GUILD: u64 = 900_000_000_000_000_002;
const OWNER: u64 = factory::lfg::DEFAULT_OWNER_ID;
/// Member ID the fake directory cannot resolve.
const UNKNOWN_MEMBER: u64 = 999;

/// Registry wired to fakes over an in-memory database.
struct Setup {
    /// Keeps the in-memory database alive for the registry's connection.
    test: TestContext,
    registry: LfgRegistry,
    notifier: Arc<FakeNotifier>,
}

impl Setup {
    fn db(&self) -> &sea_orm::DatabaseConnection {
        self.test.db.as_ref().unwrap()
    }
}

/// Registry with the `lfg` table in place.
async fn setup(lead_seconds: u64) -> Setup {
    setup_with(TestBuilder::new().with_lfg_tables(), lead_seconds).await
}

async fn setup_with(builder: TestBuilder, lead_seconds: u64) -> Setup {
    let test = builder.build().await.unwrap();
    let db = test.db.clone().unwrap();
    let notifier = Arc::new(FakeNotifier::default());
    let directory = FakeDirectory::new()
        .guild(GUILD, "Gamepad")
        .guild(OTHER_GUILD, "Other")
        .member(GUILD, OWNER, "owner")
        .member(OTHER_GUILD, OWNER, "owner");
    let directory = (2..=5).fold(directory, |directory, id| {
        directory.member(GUILD, id, &format!("member-{}", id))
    });

    let registry = LfgRegistry::new(
        db,
        Arc::new(directory),
        notifier.clone(),
        UTC,
        lead_seconds,
    );

    Setup {
        test,
        registry,
        notifier,
    }
}

fn guild() -> GuildRef {
    GuildRef {
        id: GuildId::new(GUILD),
        name: "Gamepad".to_string(),
    }
}

fn owner() -> RosterMember {
    RosterMember::new(UserId::new(OWNER), "owner")
}

fn member(id: u64) -> RosterMember {
    RosterMember::new(UserId::new(id), format!("member-{}", id))
}

/// Details starting `seconds` from now, at sub-second precision.
fn details_in(seconds: i64) -> LfgDetails {
    LfgDetails {
        name: "Raid night".to_string(),
        description: "Bring potions".to_string(),
        game: "Destiny 2".to_string(),
        scheduled_at: (Utc::now() + TimeDelta::seconds(seconds)).with_timezone(&UTC),
    }
}

/// Creates an LFG with the owner joined, without scheduling it.
async fn create_joined(registry: &LfgRegistry, seconds: i64) -> i32 {
    let id = registry.create(details_in(seconds), guild(), owner()).await;
    registry.join(id, owner()).await.unwrap();
    id
}
