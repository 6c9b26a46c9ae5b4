//! Small, dependency-free helpers shared across layers.

pub mod time_text;
