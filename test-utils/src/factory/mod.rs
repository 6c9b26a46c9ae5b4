//! Factory methods for creating test data.
//!
//! Each factory inserts rows straight into the store with sensible defaults, so tests
//! can stage "what the database held before boot" without going through the registry.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let row = factory::lfg::LfgFactory::new(&db, 3)
//!     .participants([111, 222])
//!     .build()
//!     .await?;
//! ```

pub mod helpers;
pub mod lfg;
