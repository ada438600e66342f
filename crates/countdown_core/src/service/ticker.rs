//! Periodic countdown refresh.
//!
//! # Responsibility
//! - Publish the engine state once immediately, then every tick.
//! - Own the repeating task and stop it on cancel or drop.
//!
//! # Invariants
//! - The initial state is published before the task is spawned.
//! - Each tick reads the clock fresh; there is no drift correction.
//! - Identical consecutive states do not wake subscribers.

use super::countdown_engine::{CountdownEngine, CountdownState};
use crate::clock::Clock;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug)]
pub enum TickerError {
    /// The engine has no target yet.
    NotResolved,
    /// Called outside a tokio runtime.
    NoRuntime(tokio::runtime::TryCurrentError),
    ZeroPeriod,
}

impl Display for TickerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotResolved => write!(f, "countdown target has not been resolved"),
            Self::NoRuntime(err) => write!(f, "countdown ticker needs a tokio runtime: {err}"),
            Self::ZeroPeriod => write!(f, "countdown tick period must be greater than zero"),
        }
    }
}

impl Error for TickerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoRuntime(err) => Some(err),
            Self::NotResolved | Self::ZeroPeriod => None,
        }
    }
}

/// Handle to a running countdown refresh task.
///
/// Dropping the handle cancels the task.
pub struct CountdownTicker {
    state: watch::Receiver<CountdownState>,
    task: JoinHandle<()>,
}

impl CountdownTicker {
    /// Publishes the current state and starts refreshing it every `period`.
    ///
    /// # Errors
    /// - `TickerError::NotResolved` when the engine has no target.
    /// - `TickerError::NoRuntime` when called outside a tokio runtime.
    /// - `TickerError::ZeroPeriod` when `period` is zero.
    pub fn start<C>(engine: Arc<CountdownEngine<C>>, period: Duration) -> Result<Self, TickerError>
    where
        C: Clock + Send + Sync + 'static,
    {
        let Some(target) = engine.target() else {
            return Err(TickerError::NotResolved);
        };
        if period.is_zero() {
            return Err(TickerError::ZeroPeriod);
        }
        let runtime = Handle::try_current().map_err(TickerError::NoRuntime)?;

        let (sender, state) = watch::channel(engine.snapshot());
        let task = runtime.spawn(run_ticks(engine, period, sender));
        info!(
            "event=ticker_start module=ticker status=ok target_ms={target} period_ms={}",
            period.as_millis()
        );

        Ok(Self { state, task })
    }

    /// Latest published state.
    pub fn current(&self) -> CountdownState {
        *self.state.borrow()
    }

    /// New receiver observing every published change.
    ///
    /// The channel closes once the ticker is cancelled.
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state.clone()
    }

    /// Stops the refresh task. Idempotent.
    pub fn cancel(&self) {
        if !self.task.is_finished() {
            self.task.abort();
            info!("event=ticker_cancel module=ticker status=ok");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_ticks<C>(
    engine: Arc<CountdownEngine<C>>,
    period: Duration,
    sender: watch::Sender<CountdownState>,
) where
    C: Clock + Send + Sync + 'static,
{
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let next = engine.snapshot();
        let changed = sender.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
        debug!("event=ticker_tick module=ticker status=ok changed={changed}");
    }
}

#[cfg(test)]
mod tests {
    use super::{CountdownTicker, TickerError};
    use crate::clock::ManualClock;
    use crate::service::countdown_engine::CountdownEngine;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn start_outside_runtime_is_an_error() {
        let engine = Arc::new(CountdownEngine::new(ManualClock::new(0)));
        engine
            .resolve(crate::model::target::TargetTimestamp::from_epoch_ms(10_000))
            .unwrap();

        let result = CountdownTicker::start(engine, Duration::from_secs(1));
        assert!(matches!(result, Err(TickerError::NoRuntime(_))));
    }

    #[tokio::test]
    async fn unresolved_engine_cannot_start() {
        let engine = Arc::new(CountdownEngine::new(ManualClock::new(0)));
        let result = CountdownTicker::start(engine, Duration::from_secs(1));
        assert!(matches!(result, Err(TickerError::NotResolved)));
    }
}
