//! Common types for the TCC coordination core
//!
//! This crate defines:
//! - Transaction identity (UUIDv7-based, global + branch qualifier)
//! - Physical timestamps (microseconds since Unix epoch)
//! - Transaction and participant status enums
//! - The derived participant role classification

mod participant;
mod role;
mod status;
mod timestamp;
mod xid;

pub use participant::ParticipantStatus;
pub use role::ParticipantRole;
pub use status::TransactionStatus;
pub use timestamp::Timestamp;
pub use xid::TransactionXid;
