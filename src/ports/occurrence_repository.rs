//! Occurrence repository port.

use async_trait::async_trait;

use super::{OccurrenceFilter, RepositoryError};
use crate::domain::agreement::Occurrence;
use crate::domain::foundation::{OccurrenceId, Timestamp};

/// Occurrence persistence, bound to one open transaction.
///
/// Occurrences are never deleted; `archive` sets the cancellation timestamp.
#[async_trait]
pub trait OccurrenceRepository: Send {
    async fn insert(&mut self, occurrence: &Occurrence) -> Result<(), RepositoryError>;

    /// Insert a batch of occurrences. Either every row is written or the
    /// call fails.
    async fn insert_many(&mut self, occurrences: &[Occurrence]) -> Result<(), RepositoryError>;

    async fn update(&mut self, occurrence: &Occurrence) -> Result<(), RepositoryError>;

    /// Occurrences matching the filter, ordered by `starts_at`.
    async fn find(&mut self, filter: &OccurrenceFilter)
        -> Result<Vec<Occurrence>, RepositoryError>;

    /// # Errors
    ///
    /// - `NotFound` if no row has this id
    async fn find_one(&mut self, id: &OccurrenceId) -> Result<Occurrence, RepositoryError>;

    /// Cancel the occurrence at `at`. An already cancelled occurrence keeps
    /// its original timestamp.
    async fn archive(&mut self, id: &OccurrenceId, at: Timestamp) -> Result<(), RepositoryError>;
}
