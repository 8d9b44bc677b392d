#![forbid(unsafe_code)]

use jm_core::failure::FailureKind;
use rusqlite::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("invalid row: {0}")]
    InvalidRow(String),
    #[error("revision mismatch (expected={expected}, actual={actual})")]
    RevisionMismatch { expected: i64, actual: i64 },
    #[error("unknown id")]
    UnknownId,
}

impl StoreError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::UnknownId => FailureKind::LookupFailure,
            Self::RevisionMismatch { .. } => FailureKind::CommitConflict,
            Self::Sql(err) if is_contention(err) => FailureKind::CommitConflict,
            Self::Io(_) | Self::Sql(_) | Self::InvalidInput(_) | Self::InvalidRow(_) => {
                FailureKind::StoreUnavailable
            }
        }
    }
}

// BUSY covers SQLITE_BUSY_SNAPSHOT: a WAL reader whose snapshot went stale
// before it tried to write.
fn is_contention(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, _) => matches!(
            code.code,
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
        ),
        _ => false,
    }
}

pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("PRIMARY KEY constraint failed")
                })
        }
        _ => false,
    }
}
