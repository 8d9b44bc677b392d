#![forbid(unsafe_code)]

mod error;
mod provider;
mod sink;
mod sqlite;
mod updater;

pub use error::{Cause, UpdateError};
pub use jm_core::failure::FailureKind;
pub use provider::{JobTransaction, TransactionProvider};
pub use sink::{DiagnosticsSink, TracingSink, UpdateOp};
pub use updater::JobStatusUpdater;
