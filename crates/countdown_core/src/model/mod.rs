//! Countdown domain model.
//!
//! # Responsibility
//! - Define the target instant and the derived remaining-time value.
//! - Keep unit conversion constants in one place.
//!
//! # Invariants
//! - All instants are Unix epoch milliseconds.
//! - Remaining durations are never negative.

pub mod remaining;
pub mod target;

/// Milliseconds in one second.
pub const MS_PER_SECOND: u64 = 1_000;
/// Milliseconds in one minute.
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
/// Milliseconds in one hour.
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
/// Milliseconds in one day.
pub const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;
