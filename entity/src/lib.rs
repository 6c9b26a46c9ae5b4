//! SeaORM entities for the bot's durable store.

pub mod lfg;
pub mod prelude;
