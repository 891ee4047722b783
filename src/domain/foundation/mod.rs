//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, lifecycle status, command metadata
//! and error types used across the pickup domain.

mod command;
mod errors;
mod ids;
mod record_status;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{ErrorCode, ValidationError};
pub use ids::{AgreementId, LocationId, OccurrenceId, OrganizationId, ReportId, ScheduleId};
pub use record_status::RecordStatus;
pub use timestamp::Timestamp;
