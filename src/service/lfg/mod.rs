//! LFG lifecycle: the in-memory registry, its persistence hooks, and the command surface.

pub mod command;
pub mod registry;
mod restore;

#[cfg(test)]
mod test;
