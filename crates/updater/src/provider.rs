#![forbid(unsafe_code)]

use crate::UpdateError;
use jm_core::ids::JobId;
use jm_core::model::JobRecord;

/// A scoped unit of work against the job store.
///
/// Dropping a transaction without calling [`JobTransaction::commit`] must
/// abandon it with no visible effect.
pub trait JobTransaction {
    /// Returns the transaction's working copy of the job, fetching it on first use.
    fn job(&mut self, id: &JobId) -> Result<&mut JobRecord, UpdateError>;

    /// Applies every change made to fetched records, all or nothing.
    fn commit(self) -> Result<(), UpdateError>;
}

pub trait TransactionProvider {
    type Tx<'a>: JobTransaction
    where
        Self: 'a;

    fn begin(&mut self) -> Result<Self::Tx<'_>, UpdateError>;
}
