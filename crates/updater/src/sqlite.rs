#![forbid(unsafe_code)]

use crate::{JobTransaction, TransactionProvider, UpdateError};
use jm_core::ids::JobId;
use jm_core::model::JobRecord;
use jm_storage::{JobTx, SqliteStore, StoreError};

impl From<StoreError> for UpdateError {
    fn from(value: StoreError) -> Self {
        let kind = value.failure_kind();
        Self::new(kind, value)
    }
}

impl TransactionProvider for SqliteStore {
    type Tx<'a>
        = JobTx<'a>
    where
        Self: 'a;

    fn begin(&mut self) -> Result<JobTx<'_>, UpdateError> {
        Ok(SqliteStore::begin(self)?)
    }
}

impl JobTransaction for JobTx<'_> {
    fn job(&mut self, id: &JobId) -> Result<&mut JobRecord, UpdateError> {
        Ok(JobTx::job(self, id)?)
    }

    fn commit(self) -> Result<(), UpdateError> {
        Ok(JobTx::commit(self)?)
    }
}
