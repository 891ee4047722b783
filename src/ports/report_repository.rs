//! Report projection repository port.

use async_trait::async_trait;

use super::{RepositoryError, ReportFilter};
use crate::domain::foundation::{OccurrenceId, ReportId};
use crate::domain::report::ReportProjection;

/// Report projection persistence, bound to one open transaction.
///
/// There is no archive: projections outlive the occurrences they track.
#[async_trait]
pub trait ReportRepository: Send {
    /// # Errors
    ///
    /// - `Insert` if a projection already exists for the occurrence
    async fn insert(&mut self, report: &ReportProjection) -> Result<(), RepositoryError>;

    async fn update(&mut self, report: &ReportProjection) -> Result<(), RepositoryError>;

    async fn find(&mut self, filter: &ReportFilter)
        -> Result<Vec<ReportProjection>, RepositoryError>;

    async fn find_one(&mut self, id: &ReportId) -> Result<ReportProjection, RepositoryError>;

    /// The projection tracking an occurrence, if one exists.
    async fn find_by_occurrence(
        &mut self,
        occurrence_id: &OccurrenceId,
    ) -> Result<Option<ReportProjection>, RepositoryError>;
}
