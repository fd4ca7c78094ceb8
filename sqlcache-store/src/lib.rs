//! # sqlcache Store
//!
//! Storage backends for sqlcache payloads.
//!
//! - **Memory**: process-local TTL map, the default backend
//!
//! Remote backends implement [`Storage`] from `sqlcache-core` directly.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;

pub use memory::{MemoryStorage, MemoryStorageConfig, MemoryStorageStats};

// Re-export the trait from core
pub use sqlcache_core::traits::Storage;
