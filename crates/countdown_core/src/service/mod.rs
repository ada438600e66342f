//! Countdown use-case services.
//!
//! # Responsibility
//! - Resolve the session target against storage.
//! - Compute and periodically publish the remaining time.
//! - Keep presentation layers decoupled from storage and timers.

pub mod countdown_engine;
pub mod session;
pub mod target_resolver;
pub mod ticker;
