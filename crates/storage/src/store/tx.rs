#![forbid(unsafe_code)]

use super::jobs::select_job;
use super::*;
use jm_core::ids::JobId;
use jm_core::model::JobRecord;
use rusqlite::{OptionalExtension, Transaction, params};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

struct Fetched {
    revision: i64,
    original: JobRecord,
    working: JobRecord,
}

/// Working copies of job records bound to one SQLite transaction.
///
/// Records are read on first access and written back on [`JobTx::commit`].
/// Each write is guarded by the revision observed at fetch time, so a row
/// changed underneath the transaction fails the commit instead of being
/// overwritten.
pub struct JobTx<'conn> {
    tx: Transaction<'conn>,
    fetched: BTreeMap<JobId, Fetched>,
}

impl std::fmt::Debug for JobTx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobTx")
            .field("fetched", &self.fetched.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<'conn> JobTx<'conn> {
    pub(super) fn new(tx: Transaction<'conn>) -> Self {
        Self {
            tx,
            fetched: BTreeMap::new(),
        }
    }

    pub fn job(&mut self, id: &JobId) -> Result<&mut JobRecord, StoreError> {
        let fetched = match self.fetched.entry(id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let row = select_job(&self.tx, id)?.ok_or(StoreError::UnknownId)?;
                entry.insert(Fetched {
                    revision: row.revision,
                    original: row.record.clone(),
                    working: row.record,
                })
            }
        };
        Ok(&mut fetched.working)
    }

    pub fn commit(self) -> Result<(), StoreError> {
        let now_ms = now_ms();
        for (id, fetched) in &self.fetched {
            if is_unchanged(&fetched.original, &fetched.working) {
                continue;
            }
            write_back(&self.tx, id, fetched, now_ms)?;
        }
        self.tx.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback()?;
        Ok(())
    }
}

fn is_unchanged(original: &JobRecord, working: &JobRecord) -> bool {
    original.name() == working.name()
        && original.state() == working.state()
        && original.message() == working.message()
        && original.progress().to_bits() == working.progress().to_bits()
}

fn write_back(
    tx: &Transaction<'_>,
    id: &JobId,
    fetched: &Fetched,
    now_ms: i64,
) -> Result<(), StoreError> {
    let record = &fetched.working;
    let updated = tx.execute(
        r#"
        UPDATE jobs
        SET revision = revision + 1, name = ?3, state = ?4, message = ?5, progress = ?6,
            updated_at_ms = ?7
        WHERE id = ?1 AND revision = ?2
        "#,
        params![
            id.as_str(),
            fetched.revision,
            record.name(),
            record.state().as_str(),
            record.message(),
            f64::from(record.progress()),
            now_ms
        ],
    )?;
    if updated > 0 {
        return Ok(());
    }

    let actual: Option<i64> = tx
        .query_row(
            "SELECT revision FROM jobs WHERE id=?1",
            params![id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    match actual {
        Some(actual) => {
            tracing::debug!(
                job_id = %id,
                expected = fetched.revision,
                actual,
                "job changed since fetch"
            );
            Err(StoreError::RevisionMismatch {
                expected: fetched.revision,
                actual,
            })
        }
        None => Err(StoreError::UnknownId),
    }
}
