#![forbid(unsafe_code)]

use super::error::is_constraint_violation;
use super::*;
use jm_core::ids::JobId;
use jm_core::model::{JobRecord, JobState};
use rusqlite::{Connection, OptionalExtension, params};

#[derive(Clone, Debug, PartialEq)]
pub struct JobRow {
    pub record: JobRecord,
    pub revision: i64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

struct RawJobRow {
    revision: i64,
    name: Option<String>,
    state: String,
    message: Option<String>,
    progress: Option<f64>,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl RawJobRow {
    fn into_job_row(self, id: JobId) -> Result<JobRow, StoreError> {
        let state = self
            .state
            .parse::<JobState>()
            .map_err(|err| StoreError::InvalidRow(err.to_string()))?;
        Ok(JobRow {
            record: JobRecord::from_parts(
                id,
                self.name,
                state,
                self.message,
                progress_from_sql(self.progress),
            ),
            revision: self.revision,
            created_at_ms: self.created_at_ms,
            updated_at_ms: self.updated_at_ms,
        })
    }
}

// SQLite binds NaN as NULL, so NULL reads back as NaN.
fn progress_from_sql(value: Option<f64>) -> f32 {
    value.map_or(f32::NAN, |v| v as f32)
}

pub(super) fn select_job(conn: &Connection, id: &JobId) -> Result<Option<JobRow>, StoreError> {
    let raw = conn
        .query_row(
            r#"
            SELECT revision, name, state, message, progress, created_at_ms, updated_at_ms
            FROM jobs
            WHERE id=?1
            "#,
            params![id.as_str()],
            |row| {
                Ok(RawJobRow {
                    revision: row.get(0)?,
                    name: row.get(1)?,
                    state: row.get(2)?,
                    message: row.get(3)?,
                    progress: row.get(4)?,
                    created_at_ms: row.get(5)?,
                    updated_at_ms: row.get(6)?,
                })
            },
        )
        .optional()?;
    raw.map(|raw| raw.into_job_row(id.clone())).transpose()
}

impl SqliteStore {
    /// Seeds a record. Job creation belongs to submission machinery outside the
    /// updater; this is its entry point into the store.
    pub fn job_insert(&mut self, record: &JobRecord) -> Result<JobRow, StoreError> {
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;

        let insert = tx.execute(
            r#"
            INSERT INTO jobs(
              id, revision, name, state, message, progress, created_at_ms, updated_at_ms
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id().as_str(),
                0i64,
                record.name(),
                record.state().as_str(),
                record.message(),
                f64::from(record.progress()),
                now_ms,
                now_ms
            ],
        );
        if let Err(err) = insert {
            if is_constraint_violation(&err) {
                return Err(StoreError::InvalidInput("job already exists"));
            }
            return Err(StoreError::Sql(err));
        }

        tx.commit()?;
        Ok(JobRow {
            record: record.clone(),
            revision: 0,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        })
    }

    pub fn job_get(&self, id: &JobId) -> Result<Option<JobRow>, StoreError> {
        select_job(&self.conn, id)
    }
}
