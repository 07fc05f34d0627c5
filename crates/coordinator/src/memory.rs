//! In-memory transaction manager
//!
//! The bundled [`TransactionManager`] implementation: a mutex-guarded
//! repository of transaction records plus a participant registry keyed
//! by identity. Suitable for tests and single-process embedders; a
//! durable store implements the same trait for production recovery.

use crate::error::{CoordinatorError, Result};
use crate::manager::{Participant, TransactionManager};
use crate::scope::TransactionScope;
use crate::transaction::Transaction;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tcc_common::{TransactionStatus, TransactionXid};
use tcc_protocol::TransactionContext;

struct Inner {
    transactions: Mutex<HashMap<TransactionXid, Transaction>>,
    participants: Mutex<HashMap<TransactionXid, Vec<Arc<dyn Participant>>>>,
}

/// Transaction manager backed by process memory
///
/// The repository mutex serializes access per identity. Completing a
/// transaction (commit or rollback) claims its record and participant
/// registrations under that lock before any participant callback runs,
/// so a duplicate Confirm/Cancel delivery, sequential or concurrent,
/// observes the benign `NoExistedTransaction` race instead of firing
/// the participants a second time.
#[derive(Clone)]
pub struct InMemoryTransactionManager {
    inner: Arc<Inner>,
}

impl InMemoryTransactionManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                transactions: Mutex::new(HashMap::new()),
                participants: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Register a participant under the transaction bound to the scope
    ///
    /// Called while the Try phase runs; `commit`/`rollback` later fan
    /// out to every participant enlisted here, in enlistment order.
    pub fn enlist(
        &self,
        scope: &TransactionScope,
        participant: Arc<dyn Participant>,
    ) -> Result<()> {
        let transaction = scope.current().ok_or(CoordinatorError::NoBoundTransaction)?;
        self.inner
            .participants
            .lock()
            .entry(transaction.xid)
            .or_default()
            .push(participant);
        Ok(())
    }

    /// Look up a stored record by identity
    ///
    /// Used by tests and recovery jobs; returns none once the
    /// transaction has completed.
    pub fn find(&self, xid: &TransactionXid) -> Option<Transaction> {
        self.inner.transactions.lock().get(xid).cloned()
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.inner.transactions.lock().len()
    }

    /// True when no records are held
    pub fn is_empty(&self) -> bool {
        self.inner.transactions.lock().is_empty()
    }

    /// Persist a status on the bound transaction, keeping the scope's
    /// copy in step with the repository
    fn transition(&self, scope: &TransactionScope, status: TransactionStatus) -> Result<()> {
        let bound = scope.current().ok_or(CoordinatorError::NoBoundTransaction)?;

        let updated = {
            let mut transactions = self.inner.transactions.lock();
            let record = transactions
                .get_mut(&bound.xid)
                .ok_or(CoordinatorError::NoExistedTransaction(bound.xid))?;
            record.transition(status);
            record.clone()
        };

        scope.update(|t| *t = updated);
        Ok(())
    }

    fn confirm_all(inner: &Inner, xid: TransactionXid) -> Result<()> {
        Self::complete(inner, xid, "confirm", |p| p.confirm())
    }

    fn cancel_all(inner: &Inner, xid: TransactionXid) -> Result<()> {
        Self::complete(inner, xid, "cancel", |p| p.cancel())
    }

    /// Claim the record and its registrations, then run the given hook
    /// on every enlisted participant
    ///
    /// The claim removes both before the fan-out starts, so of two
    /// concurrent deliveries of the same decision exactly one reaches
    /// the participants; the other observes `NoExistedTransaction`. A
    /// participant failure puts the claim back so a retry or the
    /// recovery job can finish the fan-out.
    fn complete(
        inner: &Inner,
        xid: TransactionXid,
        op: &'static str,
        hook: fn(&dyn Participant) -> Result<()>,
    ) -> Result<()> {
        let record = inner
            .transactions
            .lock()
            .remove(&xid)
            .ok_or(CoordinatorError::NoExistedTransaction(xid))?;
        let enlisted = inner.participants.lock().remove(&xid).unwrap_or_default();

        let mut failed = None;
        for participant in &enlisted {
            if let Err(e) = hook(participant.as_ref()) {
                failed = Some(CoordinatorError::ParticipantFailed {
                    xid: participant.xid(),
                    op,
                    message: e.to_string(),
                });
                break;
            }
        }

        if let Some(err) = failed {
            inner.transactions.lock().insert(xid, record);
            inner.participants.lock().insert(xid, enlisted);
            return Err(err);
        }
        Ok(())
    }

    fn dispatch(
        &self,
        scope: &TransactionScope,
        decision: TransactionStatus,
        fire_and_forget: bool,
        run: fn(&Inner, TransactionXid) -> Result<()>,
    ) -> Result<()> {
        self.transition(scope, decision)?;
        let transaction = scope.current().ok_or(CoordinatorError::NoBoundTransaction)?;
        let xid = transaction.xid;

        if fire_and_forget {
            let inner = self.inner.clone();
            tokio::spawn(async move {
                if let Err(err) = run(&inner, xid) {
                    tracing::error!("async {} of {} failed: {}", decision, xid, err);
                }
            });
            Ok(())
        } else {
            run(&self.inner, xid)
        }
    }
}

impl Default for InMemoryTransactionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionManager for InMemoryTransactionManager {
    fn current(&self, scope: &TransactionScope) -> Option<Transaction> {
        scope.current()
    }

    fn begin(&self, scope: &TransactionScope, xid: TransactionXid) -> Result<Transaction> {
        let transaction = Transaction::root(xid);
        self.inner
            .transactions
            .lock()
            .insert(xid, transaction.clone());
        scope.bind(transaction.clone());
        Ok(transaction)
    }

    fn propagation_new_begin(
        &self,
        scope: &TransactionScope,
        context: &TransactionContext,
    ) -> Result<Transaction> {
        // A retry of the same logical Try reuses the recorded outcome
        // instead of regressing it to Trying.
        let transaction = self
            .inner
            .transactions
            .lock()
            .entry(*context.xid())
            .or_insert_with(|| Transaction::branch(*context.xid()))
            .clone();
        scope.bind(transaction.clone());
        Ok(transaction)
    }

    fn propagation_exist_begin(
        &self,
        scope: &TransactionScope,
        context: &TransactionContext,
    ) -> Result<Transaction> {
        let transaction = self
            .inner
            .transactions
            .lock()
            .get(context.xid())
            .cloned()
            .ok_or(CoordinatorError::NoExistedTransaction(*context.xid()))?;
        scope.bind(transaction.clone());
        Ok(transaction)
    }

    fn change_status(&self, scope: &TransactionScope, status: TransactionStatus) -> Result<()> {
        self.transition(scope, status)
    }

    fn commit(&self, scope: &TransactionScope, async_confirm: bool) -> Result<()> {
        self.dispatch(
            scope,
            TransactionStatus::Confirming,
            async_confirm,
            Self::confirm_all,
        )
    }

    fn rollback(&self, scope: &TransactionScope, async_cancel: bool) -> Result<()> {
        self.dispatch(
            scope,
            TransactionStatus::Cancelling,
            async_cancel,
            Self::cancel_all,
        )
    }

    fn clean_after_completion(&self, scope: &TransactionScope, transaction: Option<&Transaction>) {
        if transaction.is_some() {
            scope.unbind();
        }
    }
}
