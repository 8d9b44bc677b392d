#![forbid(unsafe_code)]

use crate::{
    DiagnosticsSink, JobTransaction, TracingSink, TransactionProvider, UpdateError, UpdateOp,
};
use jm_core::ids::JobId;
use jm_core::model::{COMPLETE_PROGRESS, JobRecord, JobState};

/// Updates a job's name, state, message and progress, one transaction per call.
///
/// Failures are reported to the sink and then returned unchanged. Nothing is
/// retried here: callers that want retry-with-backoff wrap these calls.
#[derive(Debug)]
pub struct JobStatusUpdater<P, S = TracingSink> {
    provider: P,
    sink: S,
}

impl<P> JobStatusUpdater<P, TracingSink> {
    pub fn with_tracing(provider: P) -> Self {
        Self {
            provider,
            sink: TracingSink,
        }
    }
}

impl<P, S> JobStatusUpdater<P, S>
where
    P: TransactionProvider,
    S: DiagnosticsSink,
{
    pub fn new(provider: P, sink: S) -> Self {
        Self { provider, sink }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (P, S) {
        (self.provider, self.sink)
    }

    pub fn rename(&mut self, job_id: &JobId, name: impl Into<String>) -> Result<(), UpdateError> {
        let name = name.into();
        self.apply(UpdateOp::Rename, job_id, |job| job.set_name(name))
    }

    /// Sets the state and overwrites the message (`None` clears it). Moving to
    /// `Done` also sets progress to 1.0 in the same transaction.
    pub fn set_state(
        &mut self,
        job_id: &JobId,
        state: JobState,
        message: Option<String>,
    ) -> Result<(), UpdateError> {
        self.apply(UpdateOp::SetState, job_id, |job| {
            job.set_state(state);
            job.set_message(message);
            if state.is_terminal_done() {
                job.set_progress(COMPLETE_PROGRESS);
            }
        })
    }

    pub fn set_state_without_message(
        &mut self,
        job_id: &JobId,
        state: JobState,
    ) -> Result<(), UpdateError> {
        self.set_state(job_id, state, None)
    }

    pub fn set_progress(&mut self, job_id: &JobId, progress: f32) -> Result<(), UpdateError> {
        self.apply(UpdateOp::SetProgress, job_id, |job| job.set_progress(progress))
    }

    fn apply(
        &mut self,
        op: UpdateOp,
        job_id: &JobId,
        mutate: impl FnOnce(&mut JobRecord),
    ) -> Result<(), UpdateError> {
        let result = mutate_in_tx(&mut self.provider, job_id, mutate);
        if let Err(err) = &result {
            self.sink.failure(op, job_id, err);
        }
        result
    }
}

fn mutate_in_tx<P: TransactionProvider>(
    provider: &mut P,
    job_id: &JobId,
    mutate: impl FnOnce(&mut JobRecord),
) -> Result<(), UpdateError> {
    let mut tx = provider.begin()?;
    mutate(tx.job(job_id)?);
    tx.commit()
}
