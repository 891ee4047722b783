//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer is the cascading persistence coordinator: it validates and
//! expands input, then drives the repository ports inside one transaction
//! per command.

mod cascade;
mod error;
pub mod handlers;

pub use cascade::ArchiveSummary;
pub use error::ServiceError;
pub use handlers::{
    // Agreement handlers
    ArchiveAgreementCommand, ArchiveAgreementHandler, ArchiveAgreementResult,
    CreateAgreementCommand, CreateAgreementHandler, GetAgreementHandler, GetAgreementQuery,
    ListAgreementsHandler, ListAgreementsQuery, ScheduleRequest,
    // Schedule handlers
    ArchiveScheduleCommand, ArchiveScheduleHandler, ArchiveScheduleResult,
    ListOccurrencesHandler, ListOccurrencesQuery, UpdateScheduleCommand, UpdateScheduleHandler,
    // Report handlers
    ListReportsHandler, ListReportsQuery,
};
