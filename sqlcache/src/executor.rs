//! The cache orchestrator.
//!
//! [`CachedExecutor`] decorates another [`QueryExecutor`]. Every call runs the
//! same sequence:
//!
//! 1. Resolve the TTL: per-call override, else the configured default.
//! 2. Resolve the key: per-call override verbatim, else
//!    `prefix + key_generator(identifier)`.
//! 3. Read storage. A payload that decodes is returned and the database is
//!    never touched. Storage errors, absent or empty payloads and decode
//!    failures all count as a miss.
//! 4. On a miss, run the wrapped executor with the same finalized query.
//!    Its errors are returned unchanged and nothing is written back.
//! 5. Encode the fresh result and store it with the resolved TTL. Failures
//!    here are logged; the caller still gets the result.
//!
//! There is no per-key coalescing: concurrent misses on one key each query the
//! database and each write back. The last write wins.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use sqlcache_codec::Codec;
use sqlcache_core::error::Result;
use sqlcache_core::key::{CacheKey, KeyGenerator};
use sqlcache_core::traits::{QueryExecutor, Record, Serializer, Storage};
use sqlcache_core::types::{Overrides, Query};
use sqlcache_store::MemoryStorage;

use crate::config::CacheConfig;
use crate::stats::CacheStats;

/// A [`QueryExecutor`] that serves repeated queries from storage.
///
/// # Example
///
/// ```rust,ignore
/// let cached = CachedExecutor::new(postgres_executor);
///
/// let query = Query::new("SELECT * FROM users WHERE id = $1").bind(42);
/// let users: Vec<User> = cached.fetch_all(&query).await?; // database
/// let users: Vec<User> = cached.fetch_all(&query).await?; // cache
///
/// // Per-call overrides
/// let query = query.with_cache_key("user:42").with_ttl(Duration::from_secs(30));
/// let user: Option<User> = cached.fetch_optional(&query).await?;
/// ```
pub struct CachedExecutor<E, S = MemoryStorage, Z = Codec> {
    inner: E,
    storage: S,
    serializer: Z,
    config: CacheConfig,
    key_generator: KeyGenerator,
    stats: CacheStats,
}

impl<E: QueryExecutor> CachedExecutor<E> {
    /// Wraps `inner` with in-memory storage and the default configuration.
    pub fn new(inner: E) -> Self {
        Self::with_config(inner, CacheConfig::default())
    }

    /// Wraps `inner` with in-memory storage and the serializer named in `config`.
    pub fn with_config(inner: E, config: CacheConfig) -> Self {
        let serializer = Codec::from(config.serializer);
        Self::from_parts(inner, MemoryStorage::new(), serializer, config)
    }
}

impl<E, S, Z> CachedExecutor<E, S, Z>
where
    E: QueryExecutor,
    S: Storage,
    Z: Serializer,
{
    /// Assembles a cache from explicit parts.
    ///
    /// `serializer` takes precedence over `config.serializer`. The config is
    /// normalized here, so an unusable prefix or TTL is repaired once at
    /// construction rather than on every call.
    pub fn from_parts(inner: E, storage: S, serializer: Z, config: CacheConfig) -> Self {
        let config = config.normalized();
        let key_generator = KeyGenerator::from(config.key_strategy);
        debug!(
            prefix = %config.prefix,
            ttl_seconds = config.default_ttl_seconds,
            format = serializer.format(),
            key_generator = key_generator.name(),
            "Query cache configured"
        );

        Self {
            inner,
            storage,
            serializer,
            config,
            key_generator,
            stats: CacheStats::new(),
        }
    }

    /// Replaces the configured key strategy with a custom generator.
    pub fn with_key_generator(mut self, key_generator: KeyGenerator) -> Self {
        self.key_generator = key_generator;
        self
    }

    /// The key a query's result is stored under.
    pub fn cache_key(&self, query: &Query) -> CacheKey {
        CacheKey::resolve(
            &query.statement,
            &query.overrides,
            &self.config.prefix,
            &self.key_generator,
        )
    }

    /// The TTL a fresh result would be stored with.
    pub fn resolve_ttl(&self, overrides: &Overrides) -> Duration {
        match overrides.ttl() {
            Some(ttl) => ttl,
            None => {
                debug!("Using default TTL");
                self.config.default_ttl()
            }
        }
    }

    /// Drops the cached result for `query`, if any.
    pub async fn invalidate(&self, query: &Query) -> Result<()> {
        let key = self.cache_key(query);
        self.invalidate_key(key.as_str()).await
    }

    /// Drops whatever is stored under `key`.
    pub async fn invalidate_key(&self, key: &str) -> Result<()> {
        debug!(key, "Invalidating cache entry");
        self.storage.delete(key).await
    }

    /// Drops every stored entry.
    pub async fn clear(&self) -> Result<()> {
        self.storage.reset().await
    }

    /// Hit/miss counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The normalized configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The wrapped executor.
    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The payload serializer.
    pub fn serializer(&self) -> &Z {
        &self.serializer
    }

    #[instrument(skip_all, fields(path = path, sql = %query.statement.sql()))]
    async fn read_through<T, F, Fut>(&self, query: &Query, path: &'static str, execute: F) -> Result<T>
    where
        T: Record,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        let ttl = self.resolve_ttl(&query.overrides);
        let key = self.cache_key(query);

        if let Some(cached) = self.read_cache::<T>(&key).await {
            self.stats.record_hit();
            debug!(%key, path, "From cache");
            return Ok(cached);
        }
        self.stats.record_miss();

        let fresh = match execute().await {
            Ok(fresh) => fresh,
            Err(e) => {
                self.stats.record_execution_failure();
                debug!(%key, path, error = %e, "Query failed, skipping write-back");
                return Err(e);
            }
        };
        debug!(%key, path, "From database");

        match self.write_back(&key, &fresh, ttl).await {
            Ok(()) => {
                self.stats.record_write();
                debug!(%key, ttl_ms = ttl.as_millis() as u64, "Cache persisted");
            }
            Err(e) => {
                self.stats.record_write_failure();
                warn!(%key, error = %e, "Cache write-back failed");
            }
        }

        Ok(fresh)
    }

    async fn read_cache<T: Record>(&self, key: &CacheKey) -> Option<T> {
        let payload = match self.storage.get(key.as_str()).await {
            Ok(Some(payload)) if !payload.is_empty() => payload,
            Ok(_) => {
                debug!(%key, "Cache miss");
                return None;
            }
            Err(e) => {
                debug!(%key, error = %e, "Storage read failed, treating as miss");
                return None;
            }
        };

        match self.serializer.deserialize::<T>(&payload) {
            Ok(value) => Some(value),
            Err(e) => {
                self.stats.record_corrupt_entry();
                warn!(
                    %key,
                    format = self.serializer.format(),
                    error = %e,
                    "Undecodable cache entry"
                );
                if self.config.delete_corrupt_entries {
                    if let Err(e) = self.storage.delete(key.as_str()).await {
                        warn!(%key, error = %e, "Failed to delete undecodable cache entry");
                    }
                }
                None
            }
        }
    }

    async fn write_back<T: Record>(&self, key: &CacheKey, value: &T, ttl: Duration) -> Result<()> {
        let payload = self.serializer.serialize(value)?;
        self.storage.set(key.as_str(), payload, ttl).await
    }
}

#[async_trait]
impl<E, S, Z> QueryExecutor for CachedExecutor<E, S, Z>
where
    E: QueryExecutor,
    S: Storage,
    Z: Serializer,
{
    async fn fetch_all<T: Record>(&self, query: &Query) -> Result<Vec<T>> {
        self.read_through(query, "rows", || self.inner.fetch_all::<T>(query))
            .await
    }

    async fn fetch_optional<T: Record>(&self, query: &Query) -> Result<Option<T>> {
        self.read_through(query, "row", || self.inner.fetch_optional::<T>(query))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde::{Deserialize, Serialize};
    use sqlcache_codec::SerializerKind;
    use sqlcache_core::constants::DEFAULT_TTL;
    use sqlcache_core::error::SqlCacheError;
    use sqlcache_core::key::KeyStrategy;
    use test_case::test_case;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        id: i64,
        name: String,
    }

    fn alice() -> User {
        User {
            id: 42,
            name: "alice".into(),
        }
    }

    fn users_by_id(id: i64) -> Query {
        Query::new("SELECT * FROM users WHERE id = ?").bind(id)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TEST DOUBLES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns canned rows and records every query it receives.
    #[derive(Default)]
    struct MockDatabase {
        rows: serde_json::Value,
        fail: bool,
        calls: AtomicUsize,
        seen: Mutex<Vec<Query>>,
    }

    impl MockDatabase {
        fn with_rows(rows: Vec<User>) -> Arc<Self> {
            Self::with_column(rows)
        }

        /// Rows of any shape, e.g. a single `count(*)` column.
        fn with_column<R: Serialize>(rows: Vec<R>) -> Arc<Self> {
            Arc::new(Self {
                rows: serde_json::json!(rows),
                ..Default::default()
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                ..Default::default()
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn scan<T: Record>(&self, query: &Query) -> Result<Vec<T>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().push(query.clone());
            if self.fail {
                return Err(SqlCacheError::Execution("relation \"users\" does not exist".into()));
            }
            Ok(serde_json::from_value(self.rows.clone())?)
        }
    }

    #[async_trait]
    impl QueryExecutor for MockDatabase {
        async fn fetch_all<T: Record>(&self, query: &Query) -> Result<Vec<T>> {
            self.scan(query)
        }

        async fn fetch_optional<T: Record>(&self, query: &Query) -> Result<Option<T>> {
            Ok(self.scan(query)?.into_iter().next())
        }
    }

    /// Memory storage that records writes and can be told to fail.
    #[derive(Default)]
    struct RecordingStorage {
        backend: MemoryStorage,
        fail_get: bool,
        fail_set: bool,
        empty_get: bool,
        sets: Mutex<Vec<(String, Duration)>>,
        deletes: Mutex<Vec<String>>,
    }

    impl RecordingStorage {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn set_count(&self) -> usize {
            self.sets.lock().len()
        }

        fn last_set(&self) -> Option<(String, Duration)> {
            self.sets.lock().last().cloned()
        }
    }

    #[async_trait]
    impl Storage for RecordingStorage {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            if self.fail_get {
                return Err(SqlCacheError::Storage("connection refused".into()));
            }
            if self.empty_get {
                return Ok(Some(Vec::new()));
            }
            self.backend.get(key).await
        }

        async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
            self.sets.lock().push((key.to_string(), ttl));
            if self.fail_set {
                return Err(SqlCacheError::Storage("read-only replica".into()));
            }
            self.backend.set(key, value, ttl).await
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.deletes.lock().push(key.to_string());
            self.backend.delete(key).await
        }

        async fn reset(&self) -> Result<()> {
            self.backend.reset().await
        }
    }

    fn cached(
        db: &Arc<MockDatabase>,
        storage: &Arc<RecordingStorage>,
        config: CacheConfig,
    ) -> CachedExecutor<Arc<MockDatabase>, Arc<RecordingStorage>, Codec> {
        let serializer = Codec::from(config.serializer);
        CachedExecutor::from_parts(db.clone(), storage.clone(), serializer, config)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // READ-THROUGH / WRITE-BACK
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn test_cold_then_warm() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let storage = RecordingStorage::new();
        let cache = cached(&db, &storage, CacheConfig::default());
        let query = users_by_id(42);

        let first: Vec<User> = cache.fetch_all(&query).await.unwrap();
        assert_eq!(first, vec![alice()]);
        assert_eq!(db.calls(), 1);
        assert_eq!(
            storage.last_set(),
            Some((
                "gobp:cache:SELECT * FROM users WHERE id = ?-[42]".to_string(),
                DEFAULT_TTL
            ))
        );

        let second: Vec<User> = cache.fetch_all(&query).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(db.calls(), 1);
        assert_eq!(storage.set_count(), 1);

        let stats = cache.stats().snapshot();
        assert_eq!((stats.hits, stats.misses, stats.writes), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_fallback_receives_same_query() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let cache = CachedExecutor::new(db.clone());
        let query = users_by_id(42).with_ttl(Duration::from_secs(9));

        let _: Vec<User> = cache.fetch_all(&query).await.unwrap();
        assert_eq!(db.seen.lock().as_slice(), &[query]);
    }

    #[tokio::test]
    async fn test_distinct_params_cached_separately() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let storage = RecordingStorage::new();
        let cache = cached(&db, &storage, CacheConfig::default());

        let _: Vec<User> = cache.fetch_all(&users_by_id(1)).await.unwrap();
        let _: Vec<User> = cache.fetch_all(&users_by_id(2)).await.unwrap();
        let _: Vec<User> = cache.fetch_all(&users_by_id(1)).await.unwrap();

        assert_eq!(db.calls(), 2);
        assert_ne!(cache.cache_key(&users_by_id(1)), cache.cache_key(&users_by_id(2)));
    }

    #[test_case(SerializerKind::Json ; "json")]
    #[test_case(SerializerKind::Bincode ; "bincode")]
    #[tokio::test]
    async fn test_hit_with_each_serializer(kind: SerializerKind) {
        let db = MockDatabase::with_rows(vec![alice(), User { id: 7, name: "bob".into() }]);
        let cache = CachedExecutor::with_config(db.clone(), CacheConfig::new().with_serializer(kind));

        let first: Vec<User> = cache.fetch_all(&Query::new("SELECT * FROM users")).await.unwrap();
        let second: Vec<User> = cache.fetch_all(&Query::new("SELECT * FROM users")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(db.calls(), 1);
        assert_eq!(cache.serializer().kind(), kind);
    }

    #[tokio::test]
    async fn test_single_row_path() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let cache = CachedExecutor::new(db.clone());
        let query = users_by_id(42);

        let first: Option<User> = cache.fetch_optional(&query).await.unwrap();
        let second: Option<User> = cache.fetch_optional(&query).await.unwrap();

        assert_eq!(first, Some(alice()));
        assert_eq!(second, first);
        assert_eq!(db.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_single_row_is_cached() {
        let db = MockDatabase::with_rows(vec![]);
        let cache = CachedExecutor::new(db.clone());
        let query = users_by_id(404);

        let first: Option<User> = cache.fetch_optional(&query).await.unwrap();
        let second: Option<User> = cache.fetch_optional(&query).await.unwrap();

        assert_eq!(first, None);
        assert_eq!(second, None);
        assert_eq!(db.calls(), 1);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // OVERRIDES
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn test_override_key_wins() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let storage = RecordingStorage::new();
        let cache = cached(&db, &storage, CacheConfig::default())
            .with_key_generator(KeyGenerator::custom(|_| "generated".to_string()));

        let query = users_by_id(42).with_cache_key("user:42");
        let _: Vec<User> = cache.fetch_all(&query).await.unwrap();

        let (key, _) = storage.last_set().unwrap();
        assert_eq!(key, "user:42");
        assert!(storage.backend.get("user:42").await.unwrap().is_some());
        assert!(storage.backend.get("gobp:cache:generated").await.unwrap().is_none());

        // A call without the override uses the generator
        assert_eq!(cache.cache_key(&users_by_id(42)).as_str(), "gobp:cache:generated");
    }

    #[tokio::test]
    async fn test_override_ttl_wins() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let storage = RecordingStorage::new();
        let cache = cached(
            &db,
            &storage,
            CacheConfig::new().with_ttl(Duration::from_secs(60)),
        );

        let query = users_by_id(42).with_ttl(Duration::from_secs(5));
        let _: Vec<User> = cache.fetch_all(&query).await.unwrap();
        assert_eq!(storage.last_set().unwrap().1, Duration::from_secs(5));

        let _: Vec<User> = cache.fetch_all(&users_by_id(43)).await.unwrap();
        assert_eq!(storage.last_set().unwrap().1, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_overrides_do_not_leak_between_calls() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let cache = CachedExecutor::new(db.clone());

        let overridden = users_by_id(42).with_cache_key("pinned");
        let _: Vec<User> = cache.fetch_all(&overridden).await.unwrap();
        let _: Vec<User> = cache.fetch_all(&users_by_id(42)).await.unwrap();

        assert_eq!(db.calls(), 2);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FAILURE HANDLING
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn test_storage_error_is_a_miss() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let storage = Arc::new(RecordingStorage {
            fail_get: true,
            ..Default::default()
        });
        let cache = cached(&db, &storage, CacheConfig::default());

        let rows: Vec<User> = cache.fetch_all(&users_by_id(42)).await.unwrap();
        assert_eq!(rows, vec![alice()]);
        assert_eq!(db.calls(), 1);
        assert_eq!(cache.stats().misses(), 1);
    }

    #[tokio::test]
    async fn test_empty_payload_is_a_miss() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let storage = Arc::new(RecordingStorage {
            empty_get: true,
            ..Default::default()
        });
        let cache = cached(&db, &storage, CacheConfig::default());

        let _: Vec<User> = cache.fetch_all(&users_by_id(42)).await.unwrap();
        let _: Vec<User> = cache.fetch_all(&users_by_id(42)).await.unwrap();
        assert_eq!(db.calls(), 2);
        assert_eq!(cache.stats().snapshot().corrupt_entries, 0);
    }

    #[tokio::test]
    async fn test_execution_failure_skips_write_back() {
        let db = MockDatabase::failing();
        let storage = RecordingStorage::new();
        let cache = cached(&db, &storage, CacheConfig::default());

        let err = cache
            .fetch_all::<User>(&users_by_id(42))
            .await
            .unwrap_err();
        assert!(matches!(err, SqlCacheError::Execution(ref msg) if msg.contains("users")));
        assert_eq!(storage.set_count(), 0);
        assert_eq!(cache.stats().snapshot().execution_failures, 1);

        let err = cache
            .fetch_optional::<User>(&users_by_id(42))
            .await
            .unwrap_err();
        assert!(err.is_execution_failure());
        assert_eq!(storage.set_count(), 0);
    }

    #[tokio::test]
    async fn test_write_back_failure_still_returns_result() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let storage = Arc::new(RecordingStorage {
            fail_set: true,
            ..Default::default()
        });
        let cache = cached(&db, &storage, CacheConfig::default());

        let rows: Vec<User> = cache.fetch_all(&users_by_id(42)).await.unwrap();
        assert_eq!(rows, vec![alice()]);

        let stats = cache.stats().snapshot();
        assert_eq!(stats.write_failures, 1);
        assert_eq!(stats.writes, 0);
    }

    #[tokio::test]
    async fn test_corrupt_entry_deleted_and_repopulated() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let storage = RecordingStorage::new();
        let cache = cached(&db, &storage, CacheConfig::default());
        let query = users_by_id(42);
        let key = cache.cache_key(&query);

        storage
            .backend
            .set(key.as_str(), b"\x00garbage".to_vec(), DEFAULT_TTL)
            .await
            .unwrap();

        let rows: Vec<User> = cache.fetch_all(&query).await.unwrap();
        assert_eq!(rows, vec![alice()]);
        assert_eq!(db.calls(), 1);
        assert_eq!(storage.deletes.lock().as_slice(), &[key.to_string()]);
        assert_eq!(cache.stats().snapshot().corrupt_entries, 1);

        let again: Vec<User> = cache.fetch_all(&query).await.unwrap();
        assert_eq!(again, rows);
        assert_eq!(db.calls(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_entry_kept_when_deletion_disabled() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let storage = RecordingStorage::new();
        let cache = cached(
            &db,
            &storage,
            CacheConfig::new().with_delete_corrupt_entries(false),
        );
        let query = users_by_id(42);
        let key = cache.cache_key(&query);

        storage
            .backend
            .set(key.as_str(), b"{".to_vec(), DEFAULT_TTL)
            .await
            .unwrap();

        let _: Vec<User> = cache.fetch_all(&query).await.unwrap();
        assert!(storage.deletes.lock().is_empty());
        // Overwritten by the write-back
        let _: Vec<User> = cache.fetch_all(&query).await.unwrap();
        assert_eq!(db.calls(), 1);
    }

    #[test_case(SerializerKind::Json ; "json")]
    #[test_case(SerializerKind::Bincode ; "bincode")]
    #[tokio::test]
    async fn test_shape_mismatch_between_paths_is_a_miss(kind: SerializerKind) {
        let db = MockDatabase::with_rows(vec![alice()]);
        let cache = CachedExecutor::with_config(db.clone(), CacheConfig::new().with_serializer(kind));
        let query = users_by_id(42);

        let _: Vec<User> = cache.fetch_all(&query).await.unwrap();
        let row: Option<User> = cache.fetch_optional(&query).await.unwrap();

        assert_eq!(row, Some(alice()));
        assert_eq!(db.calls(), 2);
        assert_eq!(cache.stats().snapshot().corrupt_entries, 1);
    }

    #[test_case(SerializerKind::Json ; "json")]
    #[test_case(SerializerKind::Bincode ; "bincode")]
    #[tokio::test]
    async fn test_scalar_shape_mismatch_is_a_miss(kind: SerializerKind) {
        let db = MockDatabase::with_column(vec![5i64]);
        let cache = CachedExecutor::with_config(db.clone(), CacheConfig::new().with_serializer(kind));
        let query = Query::new("SELECT count(*) FROM users");

        let rows: Vec<i64> = cache.fetch_all(&query).await.unwrap();
        let one: Option<i64> = cache.fetch_optional(&query).await.unwrap();

        assert_eq!(rows, vec![5]);
        assert_eq!(one, Some(5));
        assert_eq!(db.calls(), 2);
        assert_eq!(cache.stats().snapshot().corrupt_entries, 1);

        // The single-row payload now owns the key
        let again: Option<i64> = cache.fetch_optional(&query).await.unwrap();
        assert_eq!(again, Some(5));
        assert_eq!(db.calls(), 2);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & MAINTENANCE
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn test_config_normalized_at_construction() {
        let db = MockDatabase::with_rows(vec![]);
        let cache = CachedExecutor::with_config(
            db,
            CacheConfig::new().with_prefix("").with_ttl(Duration::ZERO),
        );

        assert_eq!(cache.config().prefix, "gobp:cache:");
        assert_eq!(cache.resolve_ttl(&Overrides::new()), DEFAULT_TTL);
    }

    #[tokio::test]
    async fn test_sha3_key_strategy() {
        let db = MockDatabase::with_rows(vec![]);
        let cache = CachedExecutor::with_config(
            db,
            CacheConfig::new().with_key_strategy(KeyStrategy::Sha3),
        );

        let key = cache.cache_key(&users_by_id(42));
        let hashed = key.as_str().strip_prefix("gobp:cache:").unwrap();
        assert_eq!(hashed.len(), 64);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let cache = CachedExecutor::new(db.clone());

        let _: Vec<User> = cache.fetch_all(&users_by_id(1)).await.unwrap();
        cache.invalidate(&users_by_id(1)).await.unwrap();
        let _: Vec<User> = cache.fetch_all(&users_by_id(1)).await.unwrap();
        assert_eq!(db.calls(), 2);

        let _: Vec<User> = cache.fetch_all(&users_by_id(2)).await.unwrap();
        assert_eq!(cache.storage().len(), 2);
        cache.clear().await.unwrap();
        assert!(cache.storage().is_empty());
    }

    #[tokio::test]
    async fn test_usable_as_plain_executor() {
        async fn load_names<E: QueryExecutor>(executor: &E) -> Result<Vec<String>> {
            let users: Vec<User> = executor.fetch_all(&Query::new("SELECT * FROM users")).await?;
            Ok(users.into_iter().map(|u| u.name).collect())
        }

        let db = MockDatabase::with_rows(vec![alice()]);
        let cache = Arc::new(CachedExecutor::new(db.clone()));

        assert_eq!(load_names(&cache).await.unwrap(), vec!["alice".to_string()]);
        assert_eq!(load_names(&cache).await.unwrap(), vec!["alice".to_string()]);
        assert_eq!(load_names(cache.inner()).await.unwrap(), vec!["alice".to_string()]);
        assert_eq!(db.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_both_execute() {
        let db = MockDatabase::with_rows(vec![alice()]);
        let cache = Arc::new(CachedExecutor::new(db.clone()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    let rows: Vec<User> = cache.fetch_all(&users_by_id(42)).await?;
                    Ok::<_, SqlCacheError>(rows)
                })
            })
            .collect();

        let mut results = HashMap::new();
        for handle in handles {
            let rows = handle.await.unwrap().unwrap();
            *results.entry(rows.len()).or_insert(0) += 1;
        }

        assert_eq!(results.get(&1), Some(&4));
        assert!(db.calls() >= 1 && db.calls() <= 4);
        let _: Vec<User> = cache.fetch_all(&users_by_id(42)).await.unwrap();
        assert!(db.calls() <= 4);
    }
}
