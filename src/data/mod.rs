//! Database repository layer.
//!
//! Repositories perform all reads and writes against the durable store through SeaORM.
//! Nothing outside this module issues queries; the LFG registry hands records in and
//! gets entity models back.

pub mod lfg;

#[cfg(test)]
mod test;
