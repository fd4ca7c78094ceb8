//! Boundary traits for sqlcache.
//!
//! The cache sits between two collaborators it does not own: a key/value
//! [`Storage`] backend and a [`QueryExecutor`] that actually talks to the
//! database. A [`Serializer`] turns results into opaque payloads for storage.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::types::Query;

/// Anything that can be returned by a query and stored in the cache.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Record for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

// ═══════════════════════════════════════════════════════════════════════════════
// STORAGE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for the key/value store holding cached payloads.
///
/// Implementations might use:
/// - In-memory storage (for testing/development)
/// - Redis/Memcached (for production)
///
/// Expiration is owned by the backend. A zero `ttl` means the entry never expires.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetches the payload stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous payload.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Removes `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every key.
    async fn reset(&self) -> Result<()>;
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        (**self).set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }

    async fn reset(&self) -> Result<()> {
        (**self).reset().await
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERIALIZER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Converts results to and from storage payloads.
///
/// Implementations must round-trip: decoding an encoded value yields a value
/// equal to the original.
pub trait Serializer: Send + Sync {
    /// Short format name, for logs and errors.
    fn format(&self) -> &'static str;

    /// Encodes a value.
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    /// Decodes a payload.
    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

impl<Z: Serializer> Serializer for Arc<Z> {
    fn format(&self) -> &'static str {
        (**self).format()
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        (**self).serialize(value)
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        (**self).deserialize(bytes)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// QUERY EXECUTOR TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for running a finalized query.
///
/// The database driver implements this. The cache implements it too, as a
/// decorator around another executor, so callers can swap one for the other.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Runs the query and scans every row.
    async fn fetch_all<T: Record>(&self, query: &Query) -> Result<Vec<T>>;

    /// Runs the query and scans at most one row.
    async fn fetch_optional<T: Record>(&self, query: &Query) -> Result<Option<T>>;
}

#[async_trait]
impl<E: QueryExecutor> QueryExecutor for Arc<E> {
    async fn fetch_all<T: Record>(&self, query: &Query) -> Result<Vec<T>> {
        (**self).fetch_all(query).await
    }

    async fn fetch_optional<T: Record>(&self, query: &Query) -> Result<Option<T>> {
        (**self).fetch_optional(query).await
    }
}
