use chrono_tz::Tz;
use std::path::PathBuf;

use crate::error::{config::ConfigError, AppError};

/// Seconds in one day, used for duration arithmetic.
pub const DAY_SECONDS: i64 = 24 * 60 * 60;

/// LFGs closer than this to their start are alerted immediately instead of scheduled.
pub const DEFAULT_ALERT_LEAD_SECONDS: u64 = 600;

/// Maximum number of entries returned by a list command.
pub const LIST_LIMIT: usize = 20;

const DEFAULT_BACKUP_PATH: &str = "dump.sql";
const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    pub backup_path: PathBuf,
    pub default_timezone: Tz,
    pub alert_lead_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            backup_path: std::env::var("BACKUP_PATH")
                .unwrap_or_else(|_| DEFAULT_BACKUP_PATH.to_string())
                .into(),
            default_timezone: parse_optional("DEFAULT_TIMEZONE", DEFAULT_TIMEZONE, |value| {
                value.parse::<Tz>().map_err(|e| e.to_string())
            })?,
            alert_lead_seconds: parse_optional(
                "LFG_ALERT_LEAD_SECONDS",
                &DEFAULT_ALERT_LEAD_SECONDS.to_string(),
                |value| value.parse::<u64>().map_err(|e| e.to_string()),
            )?,
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn parse_optional<T>(
    name: &str,
    default: &str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    let value = std::env::var(name).unwrap_or_else(|_| default.to_string());

    parse(&value).map_err(|reason| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        value,
        reason,
    })
}
