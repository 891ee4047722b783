//! Schedule command and query handlers.

mod archive_schedule;
mod list_occurrences;
mod update_schedule;

pub use archive_schedule::{ArchiveScheduleCommand, ArchiveScheduleHandler, ArchiveScheduleResult};
pub use list_occurrences::{ListOccurrencesHandler, ListOccurrencesQuery};
pub use update_schedule::{UpdateScheduleCommand, UpdateScheduleHandler};
