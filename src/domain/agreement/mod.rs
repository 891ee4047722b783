//! Agreement domain module.
//!
//! An agreement owns schedules; each schedule expands into occurrences.
//! All three are archived (soft-deleted) rather than removed.

mod aggregate;
mod graph;
mod occurrence;
mod schedule;

pub use aggregate::{Agreement, AgreementTerms};
pub use graph::{AgreementGraph, ScheduleGraph};
pub use occurrence::Occurrence;
pub use schedule::{Schedule, ScheduleChanges, ScheduleDefinition};
