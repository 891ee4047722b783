//! Agreement command and query handlers.

mod archive_agreement;
mod create_agreement;
mod get_agreement;
mod list_agreements;

pub use archive_agreement::{
    ArchiveAgreementCommand, ArchiveAgreementHandler, ArchiveAgreementResult,
};
pub use create_agreement::{CreateAgreementCommand, CreateAgreementHandler, ScheduleRequest};
pub use get_agreement::{GetAgreementHandler, GetAgreementQuery};
pub use list_agreements::{ListAgreementsHandler, ListAgreementsQuery};
