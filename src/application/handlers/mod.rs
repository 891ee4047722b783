//! Application handlers.
//!
//! Command and query handlers coordinating domain operations over one
//! transaction each.

pub mod agreement;
pub mod report;
pub mod schedule;

#[cfg(test)]
pub(crate) mod testing;

pub use agreement::{
    ArchiveAgreementCommand, ArchiveAgreementHandler, ArchiveAgreementResult,
    CreateAgreementCommand, CreateAgreementHandler, GetAgreementHandler, GetAgreementQuery,
    ListAgreementsHandler, ListAgreementsQuery, ScheduleRequest,
};
pub use report::{ListReportsHandler, ListReportsQuery};
pub use schedule::{
    ArchiveScheduleCommand, ArchiveScheduleHandler, ArchiveScheduleResult,
    ListOccurrencesHandler, ListOccurrencesQuery, UpdateScheduleCommand, UpdateScheduleHandler,
};
