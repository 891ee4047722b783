//! Schedule repository port.

use async_trait::async_trait;

use super::{RepositoryError, ScheduleFilter};
use crate::domain::agreement::Schedule;
use crate::domain::foundation::{ScheduleId, Timestamp};

/// Schedule persistence, bound to one open transaction.
#[async_trait]
pub trait ScheduleRepository: Send {
    async fn insert(&mut self, schedule: &Schedule) -> Result<(), RepositoryError>;

    /// # Errors
    ///
    /// - `NotFound` if no row has this id
    async fn update(&mut self, schedule: &Schedule) -> Result<(), RepositoryError>;

    /// Schedules matching the filter, ordered by `valid_from`.
    async fn find(&mut self, filter: &ScheduleFilter) -> Result<Vec<Schedule>, RepositoryError>;

    /// # Errors
    ///
    /// - `NotFound` if no row has this id
    async fn find_one(&mut self, id: &ScheduleId) -> Result<Schedule, RepositoryError>;

    /// Mark the schedule archived. Does not touch its occurrences.
    async fn archive(&mut self, id: &ScheduleId, at: Timestamp) -> Result<(), RepositoryError>;
}
