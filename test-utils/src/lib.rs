//! Gamepad Bot Test Utils
//!
//! Provides shared testing utilities for the bot's repository and service tests. This crate
//! offers a builder pattern for creating test contexts with in-memory SQLite databases and
//! factories for inserting `lfg` rows directly into the store.
//!
//! # Overview
//!
//! The test utilities consist of three main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn test_lfg_rows() -> Result<(), TestError> {
//!     let test = TestBuilder::new().with_lfg_tables().build().await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
