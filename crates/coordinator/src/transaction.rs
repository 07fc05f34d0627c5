//! The coordinator-side transaction record

use serde::{Deserialize, Serialize};
use tcc_common::{Timestamp, TransactionStatus, TransactionXid};

/// Whether a record is the originating transaction or one of its branches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionRole {
    /// Created at the call that originates the overall operation
    Root,
    /// Participant-local record of one service's contribution
    Branch,
}

/// Persistent record of a transaction or branch
///
/// Owned by the store; the coordination core reads and mutates it only
/// through the [`TransactionManager`](crate::TransactionManager)
/// contract. The store serializes access per identity, so a record is
/// never mutated concurrently from two coordination calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Identity of this transaction or branch
    pub xid: TransactionXid,
    /// Current lifecycle status
    pub status: TransactionStatus,
    /// Root or branch
    pub role: TransactionRole,
    /// When the record was created
    pub created_at: Timestamp,
    /// When the status last changed
    pub last_update: Timestamp,
    /// Bumped on every persisted change, for conditional updates
    pub version: u64,
}

impl Transaction {
    /// Create a root record in status `Trying`
    pub fn root(xid: TransactionXid) -> Self {
        Self::new(xid, TransactionRole::Root)
    }

    /// Create a branch record in status `Trying`
    pub fn branch(xid: TransactionXid) -> Self {
        Self::new(xid, TransactionRole::Branch)
    }

    fn new(xid: TransactionXid, role: TransactionRole) -> Self {
        let now = Timestamp::now();
        Self {
            xid,
            status: TransactionStatus::Trying,
            role,
            created_at: now,
            last_update: now,
            version: 1,
        }
    }

    /// Record a status transition
    pub fn transition(&mut self, status: TransactionStatus) {
        self.status = status;
        self.last_update = Timestamp::now();
        self.version += 1;
    }
}
