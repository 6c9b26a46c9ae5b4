//! Domain models and parameter types.
//!
//! Domain models are converted from entity models at the repository boundary and
//! rendered into summaries for the command layer. They keep business rules (roster
//! invariants, alert planning) separate from database and Discord API concerns.

pub mod discord;
pub mod lfg;
