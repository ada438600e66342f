//! Remaining-duration snapshot.
//!
//! # Responsibility
//! - Decompose a millisecond difference into days/hours/minutes/seconds.
//! - Provide the zero-padded display form consumed by renderers.
//!
//! # Invariants
//! - `total == days*DAY + hours*HOUR + minutes*MINUTE + seconds*SECOND + r`
//!   with `r < 1000`.
//! - `hours < 24`, `minutes < 60`, `seconds < 60`; `days` is unbounded.

use super::target::TargetTimestamp;
use super::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Time left until a target, split into calendar-free units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RemainingDuration {
    /// Milliseconds remaining. Zero once the target has passed.
    pub total: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl RemainingDuration {
    /// Terminal snapshot.
    pub const ZERO: Self = Self {
        total: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Computes the time left from `now_ms` until `target`.
    ///
    /// Returns [`RemainingDuration::ZERO`] when `target <= now_ms`.
    pub fn until(target: TargetTimestamp, now_ms: i64) -> Self {
        let difference = i128::from(target.epoch_ms()) - i128::from(now_ms);
        if difference <= 0 {
            return Self::ZERO;
        }
        // i64 - i64 always fits in u64 when positive.
        Self::from_millis(difference as u64)
    }

    /// Mixed-radix decomposition of a positive millisecond count.
    pub fn from_millis(total: u64) -> Self {
        Self {
            total,
            days: total / MS_PER_DAY,
            hours: (total % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (total % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (total % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    /// `total` governs completion, not the rendered fields.
    pub fn is_zero(&self) -> bool {
        self.total == 0
    }

    pub fn display(&self) -> DisplayFields {
        DisplayFields {
            days: self.days.to_string(),
            hours: format_two_digits(self.hours),
            minutes: format_two_digits(self.minutes),
            seconds: format_two_digits(self.seconds),
        }
    }
}

impl Display for RemainingDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}d {:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// String form of a snapshot as shown on a countdown card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFields {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

/// Left-pads with zeros to at least two digits.
pub fn format_two_digits(value: u64) -> String {
    format!("{value:02}")
}
