#![forbid(unsafe_code)]

pub mod ids {
    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct JobId(String);

    impl JobId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, JobIdError> {
            let value = value.into();
            validate_job_id(&value)?;
            Ok(Self(value))
        }
    }

    impl std::fmt::Display for JobId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum JobIdError {
        Empty,
        TooLong,
        InvalidFirstChar,
        InvalidChar { ch: char, index: usize },
    }

    impl std::fmt::Display for JobIdError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Empty => write!(f, "job id must not be empty"),
                Self::TooLong => write!(f, "job id is too long"),
                Self::InvalidFirstChar => write!(f, "job id must start with [A-Za-z0-9]"),
                Self::InvalidChar { ch, index } => {
                    write!(f, "job id has invalid char {ch:?} at {index}")
                }
            }
        }
    }

    impl std::error::Error for JobIdError {}

    fn validate_job_id(value: &str) -> Result<(), JobIdError> {
        if value.is_empty() {
            return Err(JobIdError::Empty);
        }
        if value.len() > 128 {
            return Err(JobIdError::TooLong);
        }
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(JobIdError::Empty);
        };
        if !first.is_ascii_alphanumeric() {
            return Err(JobIdError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate().skip(1) {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-' | ':') {
                continue;
            }
            return Err(JobIdError::InvalidChar { ch, index });
        }
        Ok(())
    }
}

pub mod model {
    use crate::ids::JobId;

    /// Lifecycle stage of a job. Transitions are not policed here: any state
    /// may follow any other.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum JobState {
        Pending,
        Running,
        Done,
        Error,
    }

    impl JobState {
        pub const ALL: [JobState; 4] = [
            JobState::Pending,
            JobState::Running,
            JobState::Done,
            JobState::Error,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                JobState::Pending => "PENDING",
                JobState::Running => "RUNNING",
                JobState::Done => "DONE",
                JobState::Error => "ERROR",
            }
        }

        /// `Done` is the only state that carries a side effect (progress = 1.0).
        pub fn is_terminal_done(self) -> bool {
            matches!(self, JobState::Done)
        }
    }

    impl std::str::FromStr for JobState {
        type Err = UnknownJobState;

        fn from_str(raw: &str) -> Result<Self, Self::Err> {
            let normalized = raw.trim().to_ascii_uppercase();
            match normalized.as_str() {
                "PENDING" => Ok(JobState::Pending),
                "RUNNING" => Ok(JobState::Running),
                "DONE" => Ok(JobState::Done),
                "ERROR" => Ok(JobState::Error),
                _ => Err(UnknownJobState(raw.to_string())),
            }
        }
    }

    impl std::fmt::Display for JobState {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct UnknownJobState(pub String);

    impl std::fmt::Display for UnknownJobState {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "unknown job state: {}", self.0)
        }
    }

    impl std::error::Error for UnknownJobState {}

    pub const COMPLETE_PROGRESS: f32 = 1.0;

    #[derive(Clone, Debug, PartialEq)]
    pub struct JobRecord {
        id: JobId,
        name: Option<String>,
        state: JobState,
        message: Option<String>,
        progress: f32,
    }

    impl JobRecord {
        pub fn new(id: JobId) -> Self {
            Self {
                id,
                name: None,
                state: JobState::Pending,
                message: None,
                progress: 0.0,
            }
        }

        pub fn from_parts(
            id: JobId,
            name: Option<String>,
            state: JobState,
            message: Option<String>,
            progress: f32,
        ) -> Self {
            Self {
                id,
                name,
                state,
                message,
                progress,
            }
        }

        pub fn id(&self) -> &JobId {
            &self.id
        }

        pub fn name(&self) -> Option<&str> {
            self.name.as_deref()
        }

        pub fn state(&self) -> JobState {
            self.state
        }

        pub fn message(&self) -> Option<&str> {
            self.message.as_deref()
        }

        pub fn progress(&self) -> f32 {
            self.progress
        }

        pub fn set_name(&mut self, name: impl Into<String>) {
            self.name = Some(name.into());
        }

        pub fn set_state(&mut self, state: JobState) {
            self.state = state;
        }

        pub fn set_message(&mut self, message: Option<String>) {
            self.message = message;
        }

        // Out-of-range values are stored verbatim.
        pub fn set_progress(&mut self, progress: f32) {
            self.progress = progress;
        }
    }
}

pub mod failure {
    /// Closed classification of store failures seen by callers of the updater.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum FailureKind {
        LookupFailure,
        CommitConflict,
        StoreUnavailable,
    }

    impl FailureKind {
        pub fn as_str(self) -> &'static str {
            match self {
                FailureKind::LookupFailure => "lookup_failure",
                FailureKind::CommitConflict => "commit_conflict",
                FailureKind::StoreUnavailable => "store_unavailable",
            }
        }
    }

    impl std::fmt::Display for FailureKind {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.as_str())
        }
    }
}
