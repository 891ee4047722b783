//! In-memory storage adapter.
//!
//! Implements every repository port over process-local tables. Used by the
//! test suite and for running the coordinator without a database.

mod repositories;
mod store;

pub use store::{InMemoryStore, InMemoryTransaction, StoreCounts};
