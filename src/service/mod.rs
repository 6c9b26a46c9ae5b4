//! Business logic layer.
//!
//! Services sit between the bot's command surface and the data layer. The LFG registry
//! owns every in-memory event and is the only component that reaches the `lfg` table;
//! the Discord collaborators resolve members and deliver alerts.

pub mod discord;
pub mod lfg;
