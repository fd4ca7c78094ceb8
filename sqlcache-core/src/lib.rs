//! # sqlcache Core
//!
//! Core types, errors, and traits for the sqlcache cache-aside layer.
//!
//! This crate provides the building blocks used by the other sqlcache crates:
//!
//! - **Types**: bound parameter values, finalized statements, per-call overrides
//! - **Identifiers & keys**: deterministic query identity and cache key resolution
//! - **Errors**: one error enum with cache-miss / execution / write-back classes
//! - **Traits**: the storage, serializer and executor boundaries
//!
//! ## Example
//!
//! ```rust
//! use sqlcache_core::{CacheKey, KeyGenerator, Overrides, Statement, DEFAULT_KEY_PREFIX};
//!
//! let stmt = Statement::new("SELECT * FROM users WHERE id = ?").bind(42);
//! let key = CacheKey::resolve(&stmt, &Overrides::new(), DEFAULT_KEY_PREFIX, &KeyGenerator::identity());
//! assert_eq!(key.as_str(), "gobp:cache:SELECT * FROM users WHERE id = ?-[42]");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod identifier;
pub mod key;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, SqlCacheError};
pub use identifier::build_identifier;
pub use key::{CacheKey, KeyGenerator, KeyStrategy};
pub use traits::*;
pub use types::*;
