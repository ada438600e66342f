//! Storage contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract the resolver depends on.
//! - Isolate SQLite query details from resolver orchestration.

pub mod kv_store;
