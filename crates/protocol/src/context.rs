//! Transaction context carried across remote call boundaries

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tcc_common::{ParticipantStatus, TransactionXid};

/// Phase of the protocol a remote call is participating in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionPhase {
    /// First pass: reserve resources
    Trying,
    /// Second pass: finalize a previously successful branch
    Confirming,
    /// Second pass: undo a branch
    Cancelling,
}

impl TransactionPhase {
    /// Parse from string header value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trying" => Some(Self::Trying),
            "confirming" => Some(Self::Confirming),
            "cancelling" => Some(Self::Cancelling),
            _ => None,
        }
    }

    /// Convert to string header value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trying => "trying",
            Self::Confirming => "confirming",
            Self::Cancelling => "cancelling",
        }
    }
}

/// Immutable context describing an in-flight transaction at a call hop
///
/// Produced by the caller, consumed read-only by the callee. A context is
/// never mutated in place; the decision pass derives a new one per hop
/// via [`with_phase`](Self::with_phase) and
/// [`with_participant_status`](Self::with_participant_status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionContext {
    xid: TransactionXid,
    phase: TransactionPhase,
    participant_status: ParticipantStatus,
}

impl TransactionContext {
    /// Create a context for a fresh branch attempt
    pub fn trying(xid: TransactionXid) -> Self {
        Self {
            xid,
            phase: TransactionPhase::Trying,
            participant_status: ParticipantStatus::Trying,
        }
    }

    /// Create a context with explicit phase and reported status
    pub fn new(
        xid: TransactionXid,
        phase: TransactionPhase,
        participant_status: ParticipantStatus,
    ) -> Self {
        Self {
            xid,
            phase,
            participant_status,
        }
    }

    /// Identity of the branch this context addresses
    pub fn xid(&self) -> &TransactionXid {
        &self.xid
    }

    /// Protocol phase of this hop
    pub fn phase(&self) -> TransactionPhase {
        self.phase
    }

    /// The caller's last observed outcome of its own Try
    pub fn participant_status(&self) -> ParticipantStatus {
        self.participant_status
    }

    /// Derive a new context for the given phase
    pub fn with_phase(&self, phase: TransactionPhase) -> Self {
        Self { phase, ..*self }
    }

    /// Derive a new context with the given reported status
    pub fn with_participant_status(&self, participant_status: ParticipantStatus) -> Self {
        Self {
            participant_status,
            ..*self
        }
    }

    /// Encode as transport headers
    pub fn to_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("txn_xid".to_string(), self.xid.to_string());
        headers.insert("txn_phase".to_string(), self.phase.as_str().to_string());
        headers.insert(
            "txn_participant_status".to_string(),
            self.participant_status.code().to_string(),
        );
        headers
    }

    /// Decode from transport headers
    ///
    /// `txn_participant_status` is optional and defaults to unreported,
    /// matching callers that never learned their own Try outcome.
    pub fn from_headers(headers: &HashMap<String, String>) -> Result<Self, ParseError> {
        let xid_str = headers
            .get("txn_xid")
            .ok_or(ParseError::MissingHeader("txn_xid"))?;
        let xid = TransactionXid::parse(xid_str)
            .map_err(|_| ParseError::InvalidXid(xid_str.clone()))?;

        let phase_str = headers
            .get("txn_phase")
            .ok_or(ParseError::MissingHeader("txn_phase"))?;
        let phase = TransactionPhase::parse(phase_str)
            .ok_or_else(|| ParseError::InvalidPhase(phase_str.clone()))?;

        let participant_status = match headers.get("txn_participant_status") {
            Some(code) => code
                .parse::<u8>()
                .ok()
                .and_then(ParticipantStatus::from_code)
                .ok_or_else(|| ParseError::InvalidParticipantStatus(code.clone()))?,
            None => ParticipantStatus::default(),
        };

        Ok(Self {
            xid,
            phase,
            participant_status,
        })
    }
}

/// Errors that can occur when decoding a context from headers
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    #[error("Invalid transaction xid: {0}")]
    InvalidXid(String),

    #[error("Invalid transaction phase: {0}")]
    InvalidPhase(String),

    #[error("Invalid participant status: {0}")]
    InvalidParticipantStatus(String),
}
