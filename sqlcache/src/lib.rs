//! # sqlcache
//!
//! Read-through cache-aside layer for SQL query execution.
//!
//! [`CachedExecutor`] wraps any [`QueryExecutor`]. For each query it derives a
//! stable key from the compiled SQL and its bound parameters, serves the
//! result from [`Storage`] when it can, and otherwise runs the query and
//! writes the result back with a time-to-live. Staleness is bounded only by
//! that TTL; nothing is invalidated when the underlying data changes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlcache::{CacheConfig, CachedExecutor, Query, QueryExecutor, SerializerKind};
//!
//! let config = CacheConfig::new().with_serializer(SerializerKind::Bincode);
//! let cached = CachedExecutor::with_config(db, config);
//!
//! let query = Query::new("SELECT * FROM users WHERE id = ?").bind(42);
//! let users: Vec<User> = cached.fetch_all(&query).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod executor;
pub mod stats;

pub use config::CacheConfig;
pub use executor::CachedExecutor;
pub use stats::{CacheStats, StatsSnapshot};

// Re-export the building blocks so most users need a single dependency
pub use sqlcache_codec::{BincodeSerializer, Codec, JsonSerializer, SerializerKind};
pub use sqlcache_core::{
    build_identifier, CacheKey, KeyGenerator, KeyStrategy, Overrides, Query, QueryExecutor,
    Record, Result, Serializer, SqlCacheError, Statement, Storage, Value,
};
pub use sqlcache_store::{MemoryStorage, MemoryStorageConfig};
