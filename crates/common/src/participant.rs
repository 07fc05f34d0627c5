//! Caller-reported participant status
//!
//! A caller broadcasting a cancel decision includes the last outcome it
//! observed for its own Try call. The callee uses this to resolve the
//! race where its branch record still reads `Trying` because the status
//! change from its Try call has not landed yet.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The caller's last observed outcome of its own Try phase
///
/// Carried on the wire as a small integer code. `Trying` doubles as
/// "no outcome reported yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ParticipantStatus {
    /// Try outcome unknown or not yet reported
    #[default]
    Trying,
    /// Caller observed its Try as succeeded
    TrySuccess,
    /// Caller observed its Try as failed
    TryFailed,
}

impl ParticipantStatus {
    /// Wire code for this status
    pub fn code(&self) -> u8 {
        match self {
            Self::Trying => 1,
            Self::TrySuccess => 2,
            Self::TryFailed => 3,
        }
    }

    /// Parse from a wire code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Trying),
            2 => Some(Self::TrySuccess),
            3 => Some(Self::TryFailed),
            _ => None,
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trying => f.write_str("trying"),
            Self::TrySuccess => f.write_str("try_success"),
            Self::TryFailed => f.write_str("try_failed"),
        }
    }
}
