//! Error types. Plumbing uses `anyhow`; the two failure kinds that callers are expected to act on,
//! bad input and failed remote writes, have their own types.

use crate::model::DocumentKey;
use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed input to a mutation. Returned before any state is changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("A goal label cannot be empty")]
    EmptyLabel,

    #[error("'{0}' is not a valid target, it must be a positive number")]
    InvalidTarget(String),

    #[error("'{0}' is not a valid amount, it must be a positive number")]
    InvalidAmount(String),

    #[error("A contribution needs a goal")]
    EmptyCategory,

    #[error("A contribution needs a place")]
    EmptyPlace,

    #[error("A goal labeled '{0}' was hidden, pick another label")]
    HiddenLabel(String),

    #[error("No goal matches '{0}'")]
    UnknownGoal(String),

    #[error("Hiding '{0}' was not confirmed")]
    NotConfirmed(String),
}

/// A request the remote endpoint did not complete. Connection problems are reported as plain
/// errors; these two cases tell an HTTP level failure apart from a refusal by the endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{operation} failed with HTTP status {status}")]
    HttpStatus {
        operation: String,
        status: reqwest::StatusCode,
    },

    #[error("{operation} was refused with status '{status}': {message}")]
    Rejected {
        operation: String,
        status: String,
        message: String,
    },
}

/// What a failed write was trying to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTarget {
    Document(DocumentKey),
    Contribution,
}

impl std::fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncTarget::Document(key) => write!(f, "{key}"),
            SyncTarget::Contribution => write!(f, "investment record"),
        }
    }
}

/// A remote write failed. The local change that produced it has already been applied and is not
/// rolled back.
#[derive(Error, Debug)]
#[error("Unable to save {target}: {source:#}")]
pub struct SyncFailure {
    target: SyncTarget,
    /// How many writes of the same batch succeeded before this one failed.
    completed: usize,
    #[source]
    source: anyhow::Error,
}

impl SyncFailure {
    pub(crate) fn new(target: SyncTarget, completed: usize, source: anyhow::Error) -> Self {
        Self {
            target,
            completed,
            source,
        }
    }

    pub fn target(&self) -> &SyncTarget {
        &self.target
    }

    pub fn completed(&self) -> usize {
        self.completed
    }
}
