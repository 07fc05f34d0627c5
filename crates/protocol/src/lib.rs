//! Wire-level transaction context for compensable calls
//!
//! This crate defines the immutable context value a caller attaches to a
//! remote compensable call, and its header codec for transports that
//! carry string key/value metadata. The transport itself is out of
//! scope; anything that can ship a small map of headers can carry a
//! context.

mod context;

pub use context::{ParseError, TransactionContext, TransactionPhase};
