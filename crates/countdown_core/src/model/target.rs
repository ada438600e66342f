//! Target timestamp model.
//!
//! # Responsibility
//! - Represent the instant a countdown runs toward.
//! - Own the persisted string form (base-10 epoch milliseconds).
//!
//! # Invariants
//! - The persisted form round-trips through `parse_persisted`.
//! - Offsets saturate instead of overflowing.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed instant a countdown reaches zero, in Unix epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetTimestamp(i64);

impl TargetTimestamp {
    pub fn from_epoch_ms(epoch_ms: i64) -> Self {
        Self(epoch_ms)
    }

    /// Computes `now + offset_ms`, saturating at `i64::MAX`.
    pub fn after(now_ms: i64, offset_ms: i64) -> Self {
        Self(now_ms.saturating_add(offset_ms))
    }

    pub fn epoch_ms(self) -> i64 {
        self.0
    }

    /// Returns whether this target is strictly later than `now_ms`.
    pub fn is_after(self, now_ms: i64) -> bool {
        self.0 > now_ms
    }

    /// Parses the stored string form.
    ///
    /// Surrounding ASCII whitespace is ignored. Anything else that is not a
    /// base-10 `i64` is rejected.
    pub fn parse_persisted(raw: &str) -> Result<Self, TargetParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TargetParseError::Empty);
        }
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| TargetParseError::NotAnInteger(trimmed.to_string()))
    }

    /// Returns the normalized string written to storage.
    pub fn to_persisted(self) -> String {
        self.0.to_string()
    }
}

impl Display for TargetTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejection reasons for a stored target value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    Empty,
    NotAnInteger(String),
}

impl Display for TargetParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "stored target is empty"),
            Self::NotAnInteger(raw) => write!(f, "stored target `{raw}` is not an integer"),
        }
    }
}

impl Error for TargetParseError {}
