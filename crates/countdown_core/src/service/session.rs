//! Countdown session orchestration.
//!
//! # Responsibility
//! - Run the two session phases in order: resolve the target once, then
//!   start the cancellable refresh task.
//! - Give callers a single handle to observe and tear down the countdown.

use super::countdown_engine::{CountdownEngine, CountdownState};
use super::target_resolver::{Resolution, TargetResolver};
use super::ticker::{CountdownTicker, TickerError};
use crate::clock::Clock;
use crate::config::CountdownConfig;
use crate::model::target::TargetTimestamp;
use crate::repo::kv_store::KeyValueStore;
use std::sync::Arc;
use tokio::sync::watch;

/// One running countdown.
pub struct CountdownSession<C: Clock> {
    resolution: Resolution,
    engine: Arc<CountdownEngine<C>>,
    ticker: CountdownTicker,
}

impl<C> CountdownSession<C>
where
    C: Clock + Clone + Send + Sync + 'static,
{
    /// Resolves the target against `store` and starts ticking.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start<S: KeyValueStore>(
        config: &CountdownConfig,
        store: S,
        clock: C,
    ) -> Result<Self, TickerError> {
        let resolution = TargetResolver::new(store, clock.clone(), config).resolve();
        let engine = Arc::new(CountdownEngine::with_target(clock, resolution.target));
        let ticker = CountdownTicker::start(Arc::clone(&engine), config.tick_interval())?;

        Ok(Self {
            resolution,
            engine,
            ticker,
        })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn target(&self) -> TargetTimestamp {
        self.resolution.target
    }

    /// Latest state published by the ticker.
    pub fn state(&self) -> CountdownState {
        self.ticker.current()
    }

    /// Recomputes outside the tick cadence without publishing.
    pub fn snapshot_now(&self) -> CountdownState {
        self.engine.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.ticker.subscribe()
    }

    /// Cancels the refresh task and releases the session.
    pub fn shutdown(self) {
        self.ticker.cancel();
    }
}
