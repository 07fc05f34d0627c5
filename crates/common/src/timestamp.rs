//! Physical timestamps as microseconds since the Unix epoch

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Microsecond-precision wall-clock timestamp
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Current wall-clock time
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        Self(micros)
    }

    /// Construct from microseconds since the Unix epoch
    pub fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Microseconds since the Unix epoch
    pub fn as_micros(&self) -> u64 {
        self.0
    }

    /// Offset this timestamp forward
    pub fn add_micros(&self, micros: u64) -> Self {
        Self(self.0.saturating_add(micros))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        let a = Timestamp::from_micros(1000);
        let b = Timestamp::from_micros(2000);
        assert!(a < b);
        assert_eq!(a.add_micros(1000), b);
    }

    #[test]
    fn test_now_is_nonzero() {
        assert!(Timestamp::now().as_micros() > 0);
    }
}
