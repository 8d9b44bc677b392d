#![forbid(unsafe_code)]

use crate::UpdateError;
use jm_core::ids::JobId;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateOp {
    Rename,
    SetState,
    SetProgress,
}

impl UpdateOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOp::Rename => "rename",
            UpdateOp::SetState => "set_state",
            UpdateOp::SetProgress => "set_progress",
        }
    }
}

impl std::fmt::Display for UpdateOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives every failed update before the error is handed back to the caller.
pub trait DiagnosticsSink {
    fn failure(&self, op: UpdateOp, job_id: &JobId, err: &UpdateError);
}

/// Forwards failures to `tracing` at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn failure(&self, op: UpdateOp, job_id: &JobId, err: &UpdateError) {
        tracing::debug!(
            target: "jm_updater",
            op = %op,
            job_id = %job_id,
            kind = %err.kind(),
            error = %err,
            "job update failed"
        );
    }
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for Arc<S> {
    fn failure(&self, op: UpdateOp, job_id: &JobId, err: &UpdateError) {
        (**self).failure(op, job_id, err);
    }
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for &S {
    fn failure(&self, op: UpdateOp, job_id: &JobId, err: &UpdateError) {
        (**self).failure(op, job_id, err);
    }
}
