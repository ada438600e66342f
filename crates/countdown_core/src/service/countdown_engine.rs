//! Countdown engine.
//!
//! # Responsibility
//! - Turn a target timestamp and a fresh clock reading into a snapshot.
//! - Track the `Unresolved -> Counting -> Complete` lifecycle.
//!
//! # Invariants
//! - The target is assigned at most once per engine.
//! - `Complete` is terminal: once observed it is returned forever, even if
//!   the clock later moves backward.
//! - `total`, not the rendered fields, decides completion.

use crate::clock::Clock;
use crate::model::remaining::RemainingDuration;
use crate::model::target::TargetTimestamp;
use log::info;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};

/// Computes the remaining duration from `now_ms` until `target`.
///
/// Returns the zero snapshot when `target <= now_ms`.
pub fn compute_remaining(target: TargetTimestamp, now_ms: i64) -> RemainingDuration {
    RemainingDuration::until(target, now_ms)
}

/// Session state exposed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "remaining", rename_all = "snake_case")]
pub enum CountdownState {
    /// No target yet.
    Unresolved,
    /// Target in the future; `total > 0`.
    Counting(RemainingDuration),
    Complete,
}

impl CountdownState {
    pub fn from_remaining(remaining: RemainingDuration) -> Self {
        if remaining.is_zero() {
            Self::Complete
        } else {
            Self::Counting(remaining)
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Snapshot to render. `Complete` renders as all zeros.
    pub fn remaining(&self) -> Option<RemainingDuration> {
        match self {
            Self::Unresolved => None,
            Self::Counting(remaining) => Some(*remaining),
            Self::Complete => Some(RemainingDuration::ZERO),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    AlreadyResolved {
        current: TargetTimestamp,
        requested: TargetTimestamp,
    },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyResolved { current, requested } => write!(
                f,
                "countdown target already resolved to {current}; refusing to switch to {requested}"
            ),
        }
    }
}

impl Error for EngineError {}

/// Countdown engine bound to one clock and, once resolved, one target.
pub struct CountdownEngine<C: Clock> {
    clock: C,
    target: OnceCell<TargetTimestamp>,
    completed: AtomicBool,
}

impl<C: Clock> CountdownEngine<C> {
    /// Creates an engine in the `Unresolved` state.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            target: OnceCell::new(),
            completed: AtomicBool::new(false),
        }
    }

    /// Creates an engine already bound to `target`.
    pub fn with_target(clock: C, target: TargetTimestamp) -> Self {
        Self {
            clock,
            target: OnceCell::with_value(target),
            completed: AtomicBool::new(false),
        }
    }

    /// Binds the target. Repeating the same target is a no-op.
    ///
    /// # Errors
    /// - `EngineError::AlreadyResolved` when a different target is bound.
    pub fn resolve(&self, target: TargetTimestamp) -> Result<(), EngineError> {
        let current = *self.target.get_or_init(|| target);
        if current != target {
            return Err(EngineError::AlreadyResolved {
                current,
                requested: target,
            });
        }
        Ok(())
    }

    pub fn target(&self) -> Option<TargetTimestamp> {
        self.target.get().copied()
    }

    /// Recomputes the state with a fresh clock reading.
    pub fn snapshot(&self) -> CountdownState {
        let Some(target) = self.target() else {
            return CountdownState::Unresolved;
        };
        if self.completed.load(Ordering::Acquire) {
            return CountdownState::Complete;
        }

        let state = CountdownState::from_remaining(compute_remaining(target, self.clock.now_ms()));
        if state.is_complete() && !self.completed.swap(true, Ordering::AcqRel) {
            info!("event=countdown_complete module=engine status=ok target_ms={target}");
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::{CountdownEngine, CountdownState, EngineError};
    use crate::clock::ManualClock;
    use crate::model::target::TargetTimestamp;

    #[test]
    fn unresolved_until_target_bound() {
        let engine = CountdownEngine::new(ManualClock::new(0));
        assert_eq!(engine.snapshot(), CountdownState::Unresolved);
        assert_eq!(engine.target(), None);

        engine.resolve(TargetTimestamp::from_epoch_ms(5_000)).unwrap();
        assert!(matches!(engine.snapshot(), CountdownState::Counting(r) if r.seconds == 5));
    }

    #[test]
    fn second_different_target_is_rejected() {
        let engine = CountdownEngine::new(ManualClock::new(0));
        let first = TargetTimestamp::from_epoch_ms(5_000);
        engine.resolve(first).unwrap();
        engine.resolve(first).unwrap();

        let err = engine
            .resolve(TargetTimestamp::from_epoch_ms(9_000))
            .unwrap_err();
        assert!(matches!(err, EngineError::AlreadyResolved { current, .. } if current == first));
        assert_eq!(engine.target(), Some(first));
    }
}
