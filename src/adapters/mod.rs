//! Adapters - Implementations of port interfaces.
//!
//! - `postgres` - PostgreSQL persistence (production)
//! - `memory` - In-process persistence (tests, development)

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresTransactionManager;
