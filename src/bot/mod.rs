//! Discord gateway client.
//!
//! The bot connects to the gateway so the serenity cache fills with guilds and members,
//! which the member directory reads before falling back to HTTP. Its HTTP client is shared
//! with the directory and the alert notifier so all Discord calls go through one client.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild names and availability for the cache
//! - `GUILD_MEMBERS` - Member display names for the cache (privileged intent)
//!
//! Note: `GUILD_MEMBERS` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application.

pub mod handler;
pub mod start;
