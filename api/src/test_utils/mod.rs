//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The in-memory repositories implement the same port traits as the
//! PostgreSQL adapters, so services and the full router can be exercised
//! without a database.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
