//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, status, errors)
//! - `recurrence` - Recurrence rules and the schedule expander
//! - `agreement` - Agreements, schedules and occurrences
//! - `report` - Per-occurrence report projections

pub mod agreement;
pub mod foundation;
pub mod recurrence;
pub mod report;
