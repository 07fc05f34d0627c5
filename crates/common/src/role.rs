//! Derived role of a compensable call

use std::fmt;

/// The role a single compensable call plays in an in-flight transaction
///
/// Derived per call, never stored. The same logical operation may be
/// `Root` on one invocation and a nested `Normal` call on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRole {
    /// This call originates the transaction
    Root,
    /// This call is a remote branch of a transaction started elsewhere
    Provider,
    /// Already inside an active transaction locally; pure pass-through
    Normal,
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Provider => f.write_str("provider"),
            Self::Normal => f.write_str("normal"),
        }
    }
}
