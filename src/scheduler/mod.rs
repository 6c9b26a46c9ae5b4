//! Timed work: the per-LFG deferred alert primitive and the hourly maintenance jobs.

pub mod deferred;
pub mod lfg_maintenance;
