#![forbid(unsafe_code)]
#![allow(dead_code)]

use jm_core::failure::FailureKind;
use jm_core::ids::JobId;
use jm_core::model::{JobRecord, JobState};
use jm_updater::{DiagnosticsSink, JobTransaction, TransactionProvider, UpdateError, UpdateOp};
use std::collections::BTreeMap;
use std::sync::Mutex;

pub fn job_id(raw: &str) -> JobId {
    JobId::try_new(raw).expect("job id")
}

/// `{name: "", state: pending, message: absent, progress: 0.0}`
pub fn fresh_job(raw: &str) -> JobRecord {
    JobRecord::from_parts(job_id(raw), Some(String::new()), JobState::Pending, None, 0.0)
}

#[derive(Debug)]
pub struct SimulatedFailure(pub &'static str);

impl std::fmt::Display for SimulatedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "simulated: {}", self.0)
    }
}

impl std::error::Error for SimulatedFailure {}

/// In-memory store with all-or-nothing commits and injectable failures.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    jobs: BTreeMap<JobId, JobRecord>,
    fail_begin: Option<FailureKind>,
    fail_commit: Option<FailureKind>,
    pub begins: usize,
    pub commits: usize,
}

impl MemoryProvider {
    pub fn with_job(record: JobRecord) -> Self {
        let mut provider = Self::default();
        provider.insert(record);
        provider
    }

    pub fn insert(&mut self, record: JobRecord) {
        self.jobs.insert(record.id().clone(), record);
    }

    pub fn get(&self, id: &JobId) -> &JobRecord {
        self.jobs.get(id).expect("job present")
    }

    pub fn fail_begin(&mut self, kind: Option<FailureKind>) {
        self.fail_begin = kind;
    }

    pub fn fail_commit(&mut self, kind: Option<FailureKind>) {
        self.fail_commit = kind;
    }
}

pub struct MemoryTx<'a> {
    provider: &'a mut MemoryProvider,
    working: BTreeMap<JobId, JobRecord>,
}

impl JobTransaction for MemoryTx<'_> {
    fn job(&mut self, id: &JobId) -> Result<&mut JobRecord, UpdateError> {
        if !self.working.contains_key(id) {
            let record = self.provider.jobs.get(id).cloned().ok_or_else(|| {
                UpdateError::new(FailureKind::LookupFailure, SimulatedFailure("no such job"))
            })?;
            self.working.insert(id.clone(), record);
        }
        self.working.get_mut(id).ok_or_else(|| {
            UpdateError::new(FailureKind::LookupFailure, SimulatedFailure("no such job"))
        })
    }

    fn commit(self) -> Result<(), UpdateError> {
        self.provider.commits += 1;
        if let Some(kind) = self.provider.fail_commit {
            return Err(UpdateError::new(kind, SimulatedFailure("commit rejected")));
        }
        self.provider.jobs.extend(self.working);
        Ok(())
    }
}

impl TransactionProvider for MemoryProvider {
    type Tx<'a>
        = MemoryTx<'a>
    where
        Self: 'a;

    fn begin(&mut self) -> Result<MemoryTx<'_>, UpdateError> {
        self.begins += 1;
        if let Some(kind) = self.fail_begin {
            return Err(UpdateError::new(kind, SimulatedFailure("store offline")));
        }
        Ok(MemoryTx {
            provider: self,
            working: BTreeMap::new(),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SinkEntry {
    pub op: UpdateOp,
    pub job_id: JobId,
    pub kind: FailureKind,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<SinkEntry>>,
}

impl RecordingSink {
    pub fn entries(&self) -> Vec<SinkEntry> {
        self.entries.lock().expect("sink lock").clone()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn failure(&self, op: UpdateOp, job_id: &JobId, err: &UpdateError) {
        self.entries.lock().expect("sink lock").push(SinkEntry {
            op,
            job_id: job_id.clone(),
            kind: err.kind(),
            error: err.to_string(),
        });
    }
}
