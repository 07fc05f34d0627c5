//! Explicit per-call-chain transaction binding
//!
//! The binding of "the transaction this call is running under" is an
//! explicit value threaded through the call chain, not ambient
//! thread-local state. Each top-level call owns one scope and shares it
//! (via `Arc`) with any nested compensable calls, which is how a nested
//! call observes an active transaction and resolves to a pass-through.

use crate::transaction::Transaction;
use parking_lot::Mutex;

/// Stack of transactions bound to one logical call chain
///
/// The top of the stack is the transaction the innermost coordination
/// call is operating on. Nesting pushes; cleanup pops.
#[derive(Debug, Default)]
pub struct TransactionScope {
    stack: Mutex<Vec<Transaction>>,
}

impl TransactionScope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// The transaction currently bound to this call chain, if any
    pub fn current(&self) -> Option<Transaction> {
        self.stack.lock().last().cloned()
    }

    /// Bind a transaction to this call chain
    pub fn bind(&self, transaction: Transaction) {
        self.stack.lock().push(transaction);
    }

    /// Unbind the innermost transaction
    pub fn unbind(&self) -> Option<Transaction> {
        self.stack.lock().pop()
    }

    /// Mutate the innermost bound transaction in place
    ///
    /// Returns false when nothing is bound.
    pub fn update(&self, f: impl FnOnce(&mut Transaction)) -> bool {
        match self.stack.lock().last_mut() {
            Some(transaction) => {
                f(transaction);
                true
            }
            None => false,
        }
    }

    /// True when no transaction is bound
    pub fn is_empty(&self) -> bool {
        self.stack.lock().is_empty()
    }
}
