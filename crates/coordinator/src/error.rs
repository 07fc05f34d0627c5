//! Error types for the coordinator

use tcc_common::TransactionXid;
use thiserror::Error;

/// Result type for coordinator operations
pub type Result<T> = std::result::Result<T, CoordinatorError>;

/// Coordinator error types
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// No branch record exists for the given identity. Benign when a
    /// duplicate Confirm/Cancel delivery races a completed branch; the
    /// coordinator absorbs it on those paths.
    #[error("No transaction found for xid {0}")]
    NoExistedTransaction(TransactionXid),

    /// The cancel race-safety rule was violated, or a branch reached the
    /// cancel path in a status the protocol does not expect. Surfaced so
    /// the transport can report delivery failure and retry later.
    #[error("Illegal transaction status: {0}")]
    IllegalTransactionStatus(String),

    /// A manager operation requiring a bound transaction found none
    #[error("No transaction bound to the current call scope")]
    NoBoundTransaction,

    /// A participant's confirm or cancel callback failed
    #[error("Participant {op} failed for {xid}: {message}")]
    ParticipantFailed {
        xid: TransactionXid,
        op: &'static str,
        message: String,
    },

    /// The backing store rejected an operation
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Outcome of a coordinated compensable call
///
/// Business errors pass through unchanged so the caller always sees the
/// true failure rather than a coordination artifact.
#[derive(Debug, Error)]
pub enum InterceptError<E: std::error::Error> {
    /// The intercepted business logic itself failed
    #[error(transparent)]
    Business(E),

    /// The coordination protocol failed
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
}

impl<E: std::error::Error> InterceptError<E> {
    /// The business error, if that is what this is
    pub fn business(self) -> Option<E> {
        match self {
            Self::Business(e) => Some(e),
            Self::Coordinator(_) => None,
        }
    }
}
