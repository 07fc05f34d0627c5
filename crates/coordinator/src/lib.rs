//! Phase resolution and branch coordination for compensation-based
//! (Try-Confirm-Cancel) distributed transactions
//!
//! A top-level call spanning multiple services runs a two-phase,
//! compensating protocol instead of a blocking two-phase commit: each
//! participating operation first reserves resources (Try), and is later
//! either finalized (Confirm) or undone (Cancel), with the decision
//! broadcast out-of-band on a second pass through the same call sites.
//!
//! ## Architecture
//!
//! The coordinator handles:
//! - Role resolution (root, provider, or pass-through) per call
//! - Phase dispatch and status transitions for each role
//! - The race-safe cancel decision for branches whose Try outcome is
//!   ambiguous
//! - Guaranteed cleanup on every exit path
//!
//! The persistence subsystem provides the [`TransactionManager`]
//! contract: begin/resume/commit/rollback/status-change/cleanup, with
//! per-identity mutual exclusion. [`InMemoryTransactionManager`] is the
//! bundled implementation used by tests and embedders.

mod coordinator;
mod error;
mod manager;
mod memory;
mod scope;
mod transaction;

pub use coordinator::{resolve_role, CompensableCall, CompensableOptions, Coordinator};
pub use error::{CoordinatorError, InterceptError, Result};
pub use manager::{Participant, TransactionManager};
pub use memory::InMemoryTransactionManager;
pub use scope::TransactionScope;
pub use transaction::{Transaction, TransactionRole};
