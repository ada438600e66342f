//! Core logic for the "coming soon" countdown.
//! Resolves a persistent target instant and keeps a remaining-time snapshot
//! fresh; rendering is left to callers.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, CountdownConfig, ExpiredTargetPolicy};
pub use logging::{default_log_level, init_logging, logging_status, LogDestination};
pub use model::remaining::{format_two_digits, DisplayFields, RemainingDuration};
pub use model::target::{TargetParseError, TargetTimestamp};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
    UnavailableStore,
};
pub use service::countdown_engine::{compute_remaining, CountdownEngine, CountdownState, EngineError};
pub use service::session::CountdownSession;
pub use service::target_resolver::{FreshReason, Resolution, TargetResolver, TargetSource};
pub use service::ticker::{CountdownTicker, TickerError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
