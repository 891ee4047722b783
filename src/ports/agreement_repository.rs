//! Agreement repository port.

use async_trait::async_trait;

use super::{AgreementFilter, RepositoryError};
use crate::domain::agreement::Agreement;
use crate::domain::foundation::{AgreementId, Timestamp};

/// Agreement persistence, bound to one open transaction.
#[async_trait]
pub trait AgreementRepository: Send {
    /// Insert a new agreement row.
    ///
    /// # Errors
    ///
    /// - `Insert` on persistence failure (including duplicate id)
    async fn insert(&mut self, agreement: &Agreement) -> Result<(), RepositoryError>;

    /// Overwrite the mutable columns of an existing agreement.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no row has this id
    /// - `Update` on persistence failure
    async fn update(&mut self, agreement: &Agreement) -> Result<(), RepositoryError>;

    /// Agreements matching the filter, ordered by `valid_from`.
    async fn find(&mut self, filter: &AgreementFilter) -> Result<Vec<Agreement>, RepositoryError>;

    /// Required lookup by id.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no row has this id
    async fn find_one(&mut self, id: &AgreementId) -> Result<Agreement, RepositoryError>;

    /// Mark the agreement archived at `at`. Already archived rows keep
    /// their original timestamp.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no row has this id
    async fn archive(&mut self, id: &AgreementId, at: Timestamp) -> Result<(), RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agreement_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AgreementRepository) {}
    }
}
