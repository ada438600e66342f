//! Target resolution use-case.
//!
//! # Responsibility
//! - Produce exactly one target timestamp per session.
//! - Recover a still-valid stored target, or compute a fresh one.
//! - Write the resolved target back so it survives reloads.
//!
//! # Invariants
//! - Storage is read at most once and written at most once per call.
//! - No storage failure is surfaced as an error; the worst case is a fresh
//!   default-offset target.
//! - If the read fails, the write is skipped.

use crate::clock::Clock;
use crate::config::{CountdownConfig, ExpiredTargetPolicy};
use crate::model::target::TargetTimestamp;
use crate::repo::kv_store::KeyValueStore;
use log::{debug, info, warn};

/// Why a fresh target was computed instead of reusing a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshReason {
    Missing,
    Malformed,
    Expired,
    StorageUnavailable,
}

impl FreshReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Malformed => "malformed",
            Self::Expired => "expired",
            Self::StorageUnavailable => "storage_unavailable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource {
    /// Stored value adopted unchanged.
    Persisted,
    Fresh(FreshReason),
}

/// Outcome of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub target: TargetTimestamp,
    pub source: TargetSource,
    /// Whether the target was written back to storage.
    pub persisted: bool,
}

/// Resolves the countdown target against injected storage and clock.
pub struct TargetResolver<'a, S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    config: &'a CountdownConfig,
}

impl<'a, S: KeyValueStore, C: Clock> TargetResolver<'a, S, C> {
    pub fn new(store: S, clock: C, config: &'a CountdownConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Resolves the target for a new session.
    ///
    /// # Contract
    /// - A stored integer strictly after `now` is adopted as-is.
    /// - A stored integer at or before `now` is adopted only under
    ///   `ExpiredTargetPolicy::StayComplete`.
    /// - Anything else yields `now + default_offset`.
    /// - The result is written back unless the read failed.
    pub fn resolve(&self) -> Resolution {
        let now = self.clock.now_ms();
        let key = self.config.storage_key.as_str();

        let stored = match self.store.get(key) {
            Ok(stored) => stored,
            Err(err) => {
                debug!("event=target_read module=resolver status=skipped key={key} error={err}");
                let target = self.fresh(now);
                info!(
                    "event=target_resolve module=resolver status=ok source=fresh reason={} target_ms={target} persisted=false",
                    FreshReason::StorageUnavailable.as_str()
                );
                return Resolution {
                    target,
                    source: TargetSource::Fresh(FreshReason::StorageUnavailable),
                    persisted: false,
                };
            }
        };

        let (target, source) = self.choose(stored.as_deref(), now);
        let persisted = match self.store.set(key, &target.to_persisted()) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=target_write module=resolver status=error key={key} error_code=store_write_failed error={err}"
                );
                false
            }
        };

        match source {
            TargetSource::Persisted => info!(
                "event=target_resolve module=resolver status=ok source=persisted target_ms={target} persisted={persisted}"
            ),
            TargetSource::Fresh(reason) => info!(
                "event=target_resolve module=resolver status=ok source=fresh reason={} target_ms={target} persisted={persisted}",
                reason.as_str()
            ),
        }

        Resolution {
            target,
            source,
            persisted,
        }
    }

    fn choose(&self, stored: Option<&str>, now: i64) -> (TargetTimestamp, TargetSource) {
        let Some(raw) = stored else {
            return (self.fresh(now), TargetSource::Fresh(FreshReason::Missing));
        };

        let candidate = match TargetTimestamp::parse_persisted(raw) {
            Ok(candidate) => candidate,
            Err(err) => {
                debug!("event=target_parse module=resolver status=rejected error={err}");
                return (self.fresh(now), TargetSource::Fresh(FreshReason::Malformed));
            }
        };

        if candidate.is_after(now)
            || self.config.expired_policy == ExpiredTargetPolicy::StayComplete
        {
            return (candidate, TargetSource::Persisted);
        }

        debug!(
            "event=target_parse module=resolver status=expired stored_ms={candidate} now_ms={now}"
        );
        (self.fresh(now), TargetSource::Fresh(FreshReason::Expired))
    }

    fn fresh(&self, now: i64) -> TargetTimestamp {
        TargetTimestamp::after(now, self.config.default_offset_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::{FreshReason, TargetResolver, TargetSource};
    use crate::clock::ManualClock;
    use crate::config::CountdownConfig;
    use crate::repo::kv_store::{KeyValueStore, MemoryKeyValueStore};

    #[test]
    fn empty_store_gets_fresh_target_written() {
        let config = CountdownConfig::default();
        let store = MemoryKeyValueStore::new();
        let clock = ManualClock::new(10);

        let resolution = TargetResolver::new(&store, &clock, &config).resolve();

        assert_eq!(resolution.source, TargetSource::Fresh(FreshReason::Missing));
        assert_eq!(resolution.target.epoch_ms(), 10 + config.default_offset_ms());
        assert!(resolution.persisted);
        assert_eq!(
            store.get(&config.storage_key).unwrap(),
            Some(resolution.target.to_persisted())
        );
    }

    #[test]
    fn padded_stored_value_is_normalized_on_write() {
        let config = CountdownConfig::default();
        let store = MemoryKeyValueStore::with_entry(config.storage_key.clone(), " 5000 ");
        let clock = ManualClock::new(10);

        let resolution = TargetResolver::new(&store, &clock, &config).resolve();

        assert_eq!(resolution.source, TargetSource::Persisted);
        assert_eq!(
            store.get(&config.storage_key).unwrap().as_deref(),
            Some("5000")
        );
    }
}
