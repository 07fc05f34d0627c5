//! Transaction status lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a transaction or branch record
///
/// Transitions are monotonic within a single protocol pass: a branch
/// observed as `TrySuccess` is never re-observed as `Trying` in the same
/// pass. Terminal committed/rolled-back states are owned by the store and
/// never reach the coordination core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Try phase in progress, outcome not yet recorded
    Trying,
    /// Confirm decision broadcast, participants being finalized
    Confirming,
    /// Cancel decision broadcast, participants being compensated
    Cancelling,
    /// Try phase completed successfully
    TrySuccess,
    /// Try phase failed
    TryFailed,
}

impl TransactionStatus {
    /// Parse from string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trying" => Some(Self::Trying),
            "confirming" => Some(Self::Confirming),
            "cancelling" => Some(Self::Cancelling),
            "try_success" => Some(Self::TrySuccess),
            "try_failed" => Some(Self::TryFailed),
            _ => None,
        }
    }

    /// Convert to string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trying => "trying",
            Self::Confirming => "confirming",
            Self::Cancelling => "cancelling",
            Self::TrySuccess => "try_success",
            Self::TryFailed => "try_failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
