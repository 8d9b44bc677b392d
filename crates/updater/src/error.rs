#![forbid(unsafe_code)]

use jm_core::failure::FailureKind;

pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure surfaced by every updater operation. The store's own error is kept
/// as the `source`.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("job lookup failed: {0}")]
    LookupFailure(#[source] Cause),
    #[error("job commit conflicted: {0}")]
    CommitConflict(#[source] Cause),
    #[error("job store unavailable: {0}")]
    StoreUnavailable(#[source] Cause),
}

impl UpdateError {
    pub fn new(kind: FailureKind, cause: impl Into<Cause>) -> Self {
        let cause = cause.into();
        match kind {
            FailureKind::LookupFailure => Self::LookupFailure(cause),
            FailureKind::CommitConflict => Self::CommitConflict(cause),
            FailureKind::StoreUnavailable => Self::StoreUnavailable(cause),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::LookupFailure(_) => FailureKind::LookupFailure,
            Self::CommitConflict(_) => FailureKind::CommitConflict,
            Self::StoreUnavailable(_) => FailureKind::StoreUnavailable,
        }
    }

    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        match self {
            Self::LookupFailure(cause)
            | Self::CommitConflict(cause)
            | Self::StoreUnavailable(cause) => cause.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn kind_round_trips_through_constructor() {
        for kind in [
            FailureKind::LookupFailure,
            FailureKind::CommitConflict,
            FailureKind::StoreUnavailable,
        ] {
            assert_eq!(UpdateError::new(kind, "boom").kind(), kind);
        }
    }

    #[test]
    fn cause_is_exposed_as_source() {
        let err = UpdateError::new(FailureKind::CommitConflict, "row changed");
        assert_eq!(err.to_string(), "job commit conflicted: row changed");
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "row changed");
        assert_eq!(err.cause().to_string(), "row changed");
    }
}
