//! Transaction identity using UUIDv7
//!
//! A transaction is identified by a global UUID; each branch of a
//! distributed transaction carries the same global half plus its own
//! branch qualifier. UUIDv7 gives time-ordered uniqueness with a
//! deterministic total ordering, which is all the coordinator needs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a transaction or one of its branches
///
/// Root transactions use the same UUID for both halves. Branches share
/// the global half and get a fresh branch qualifier. Identities are
/// stable across retries of the same logical call: the retry carries the
/// same context and therefore the same xid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionXid {
    global: Uuid,
    branch: Uuid,
}

impl TransactionXid {
    /// Generate a fresh root identity
    pub fn new() -> Self {
        let global = Uuid::now_v7();
        Self {
            global,
            branch: global,
        }
    }

    /// Create from existing UUIDs (for deserialization and testing)
    pub fn from_uuids(global: Uuid, branch: Uuid) -> Self {
        Self { global, branch }
    }

    /// Derive a branch identity sharing this xid's global half
    pub fn derive_branch(&self) -> Self {
        Self {
            global: self.global,
            branch: Uuid::now_v7(),
        }
    }

    /// The global transaction half
    pub fn global(&self) -> &Uuid {
        &self.global
    }

    /// The branch qualifier half
    pub fn branch(&self) -> &Uuid {
        &self.branch
    }

    /// True when this xid identifies the originating transaction itself
    pub fn is_root(&self) -> bool {
        self.global == self.branch
    }

    /// Parse from the `global:branch` string form
    pub fn parse(s: &str) -> Result<Self, String> {
        let (global, branch) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid transaction xid: {}", s))?;
        let global =
            Uuid::parse_str(global).map_err(|e| format!("invalid global half: {}", e))?;
        let branch =
            Uuid::parse_str(branch).map_err(|e| format!("invalid branch half: {}", e))?;
        Ok(Self { global, branch })
    }
}

impl Default for TransactionXid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionXid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.global, self.branch)
    }
}

impl PartialOrd for TransactionXid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TransactionXid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Lexicographic comparison of bytes provides total ordering
        (self.global.as_bytes(), self.branch.as_bytes())
            .cmp(&(other.global.as_bytes(), other.branch.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_xid_halves_match() {
        let xid = TransactionXid::new();
        assert!(xid.is_root());
        assert_eq!(xid.global(), xid.branch());
    }

    #[test]
    fn test_derive_branch_shares_global() {
        let root = TransactionXid::new();
        let branch = root.derive_branch();

        assert_eq!(branch.global(), root.global());
        assert_ne!(branch.branch(), root.branch());
        assert!(!branch.is_root());
    }

    #[test]
    fn test_from_uuids_is_deterministic() {
        let global = Uuid::from_u128(7);
        let a = TransactionXid::from_uuids(global, Uuid::from_u128(1));
        let b = TransactionXid::from_uuids(global, Uuid::from_u128(2));

        assert_eq!(a.global(), b.global());
        assert!(a < b);
        assert!(!a.is_root());
        assert!(TransactionXid::from_uuids(global, global).is_root());
    }

    #[test]
    fn test_string_roundtrip() {
        let xid = TransactionXid::new().derive_branch();
        let parsed = TransactionXid::parse(&xid.to_string()).unwrap();
        assert_eq!(xid, parsed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TransactionXid::parse("not-an-xid").is_err());
        assert!(TransactionXid::parse("abc:def").is_err());
    }

    #[test]
    fn test_ordering() {
        let xid1 = TransactionXid::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let xid2 = TransactionXid::new();

        assert!(xid1 <= xid2);
    }

    #[test]
    fn test_hash_eq_consistency() {
        use std::collections::HashMap;

        let xid = TransactionXid::new();
        let copy = xid;

        let mut map = HashMap::new();
        map.insert(xid, "value");
        assert_eq!(map.get(&copy), Some(&"value"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let xid = TransactionXid::new().derive_branch();
        let json = serde_json::to_string(&xid).unwrap();
        let back: TransactionXid = serde_json::from_str(&json).unwrap();
        assert_eq!(xid, back);
    }
}
