//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the coordinator and storage. Adapters implement these ports.
//!
//! ## Transaction Ports
//!
//! - `TransactionManager` - Opens a unit of work
//! - `Transaction` - Hands out repositories bound to that unit of work
//!
//! ## Repository Ports
//!
//! - `AgreementRepository`, `ScheduleRepository`, `OccurrenceRepository`,
//!   `ReportRepository` - insert/update/find/find_one(/archive) per entity
//! - Filters for `find` live in `filter`

mod agreement_repository;
mod filter;
mod occurrence_repository;
mod report_repository;
mod repository_error;
mod schedule_repository;
mod transaction;

pub use agreement_repository::AgreementRepository;
pub use filter::{AgreementFilter, OccurrenceFilter, ReportFilter, ScheduleFilter};
pub use occurrence_repository::OccurrenceRepository;
pub use report_repository::ReportRepository;
pub use repository_error::RepositoryError;
pub use schedule_repository::ScheduleRepository;
pub use transaction::{Transaction, TransactionManager};
