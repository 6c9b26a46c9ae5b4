//! Discord LFG (looking-for-group) engine.
//!
//! Members create scheduled group events in a guild, join them as participants or
//! alternatives, and receive a direct-message alert shortly before the start. The
//! collection lives in [`service::lfg::registry::LfgRegistry`] and is persisted to a
//! single SQLite table; [`service::lfg::command::LfgService`] is the command surface a
//! Discord interaction handler drives.

pub mod bot;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
