//! The transaction manager contract consumed by the coordinator
//!
//! The persistence/recovery subsystem implements this trait; the phase
//! coordinator drives the protocol through it and never touches storage
//! directly.

use crate::error::Result;
use crate::scope::TransactionScope;
use crate::transaction::Transaction;
use tcc_common::{TransactionStatus, TransactionXid};
use tcc_protocol::TransactionContext;

/// One party's reserve/finalize/undo hooks for a larger transaction
///
/// Enlisted under a transaction while its Try phase runs; the manager
/// fans `commit`/`rollback` out to every enlisted participant.
pub trait Participant: Send + Sync {
    /// Identity of the branch this participant represents
    fn xid(&self) -> TransactionXid;

    /// Finalize the reservation
    fn confirm(&self) -> Result<()>;

    /// Undo the reservation
    fn cancel(&self) -> Result<()>;
}

/// Contract between the coordination core and the transaction store
///
/// Implementations must serialize access per transaction identity: the
/// core assumes a record is exclusively owned by at most one in-progress
/// coordination call at a time and never mutates one concurrently from
/// two calls.
///
/// The call-chain binding is an explicit [`TransactionScope`] argument on
/// every operation rather than ambient state, so concurrent top-level
/// calls each thread their own scope.
pub trait TransactionManager: Send + Sync {
    /// The transaction bound to the given scope, if any
    fn current(&self, scope: &TransactionScope) -> Option<Transaction>;

    /// Create and persist a new root transaction in status `Trying`,
    /// binding it to the scope
    fn begin(&self, scope: &TransactionScope, xid: TransactionXid) -> Result<Transaction>;

    /// Create a branch record at the context's identity in status
    /// `Trying` and bind it to the scope
    ///
    /// A retry of the same logical Try call carries the same identity;
    /// an existing record is rebound rather than recreated so an already
    /// recorded outcome is never regressed to `Trying`.
    fn propagation_new_begin(
        &self,
        scope: &TransactionScope,
        context: &TransactionContext,
    ) -> Result<Transaction>;

    /// Resume the existing branch at the context's identity and bind it
    /// to the scope
    ///
    /// Fails with
    /// [`NoExistedTransaction`](crate::CoordinatorError::NoExistedTransaction)
    /// when no record exists.
    fn propagation_exist_begin(
        &self,
        scope: &TransactionScope,
        context: &TransactionContext,
    ) -> Result<Transaction>;

    /// Persist a new status on the transaction bound to the scope
    fn change_status(&self, scope: &TransactionScope, status: TransactionStatus) -> Result<()>;

    /// Confirm all participants of the bound transaction
    ///
    /// When `async_confirm` is set, confirmation is dispatched
    /// fire-and-forget and this returns immediately; otherwise
    /// confirmation errors propagate to the caller.
    fn commit(&self, scope: &TransactionScope, async_confirm: bool) -> Result<()>;

    /// Cancel all participants of the bound transaction
    ///
    /// Same synchronous/fire-and-forget choice as [`commit`](Self::commit).
    fn rollback(&self, scope: &TransactionScope, async_cancel: bool) -> Result<()>;

    /// Unbind the transaction from the scope and release local resources
    ///
    /// Runs on every exit path of a coordination call, including error
    /// paths, and therefore must not fail.
    fn clean_after_completion(&self, scope: &TransactionScope, transaction: Option<&Transaction>);
}
