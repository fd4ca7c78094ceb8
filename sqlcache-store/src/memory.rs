//! In-memory TTL storage.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sqlcache_core::error::Result;
use sqlcache_core::traits::Storage;

/// Stored payload with TTL.
#[derive(Clone)]
struct Entry {
    payload: Vec<u8>,
    inserted_at: Instant,
    /// Zero means the entry never expires.
    ttl: Duration,
}

impl Entry {
    fn is_expired(&self) -> bool {
        !self.ttl.is_zero() && self.inserted_at.elapsed() > self.ttl
    }
}

/// Memory storage configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryStorageConfig {
    /// Maximum number of entries
    pub max_entries: usize,
    /// Whether to prune expired entries before evicting live ones
    pub auto_cleanup: bool,
}

impl Default for MemoryStorageConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            auto_cleanup: true,
        }
    }
}

/// Process-local key/value storage with per-entry expiration.
///
/// Thread-safe. Expired entries are invisible to reads and are removed lazily,
/// on capacity pressure or by [`MemoryStorage::cleanup_expired`]. When full,
/// the oldest entry is evicted.
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, Entry>>,
    config: MemoryStorageConfig,
}

impl MemoryStorage {
    /// Creates storage with default configuration.
    pub fn new() -> Self {
        Self::with_config(MemoryStorageConfig::default())
    }

    /// Creates storage with custom configuration.
    pub fn with_config(config: MemoryStorageConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Removes all expired entries.
    pub fn cleanup_expired(&self) {
        self.entries.write().retain(|_, e| !e.is_expired());
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns the TTL an entry was stored with, if it is present and live.
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries
            .read()
            .get(key)
            .filter(|e| !e.is_expired())
            .map(|e| e.ttl)
    }

    /// Returns storage statistics.
    pub fn stats(&self) -> MemoryStorageStats {
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired()).count();
        MemoryStorageStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len().saturating_sub(expired),
            capacity: self.config.max_entries,
        }
    }

    fn insert(&self, key: &str, payload: Vec<u8>, ttl: Duration) {
        let mut entries = self.entries.write();

        if !entries.contains_key(key) && entries.len() >= self.config.max_entries {
            if self.config.auto_cleanup {
                entries.retain(|_, e| !e.is_expired());
            }
            if entries.len() >= self.config.max_entries {
                if let Some(oldest_key) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.inserted_at)
                    .map(|(k, _)| k.clone())
                {
                    debug!(key = %oldest_key, "Evicting oldest entry");
                    entries.remove(&oldest_key);
                }
            }
        }

        entries.insert(
            key.to_string(),
            Entry {
                payload,
                inserted_at: Instant::now(),
                ttl,
            },
        );
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read();
        Ok(entries
            .get(key)
            .filter(|e| !e.is_expired())
            .map(|e| e.payload.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.insert(key, value, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }
}

/// Memory storage statistics.
#[derive(Clone, Debug)]
pub struct MemoryStorageStats {
    /// Entries held, expired ones included
    pub total_entries: usize,
    /// Entries past their TTL but not yet removed
    pub expired_entries: usize,
    /// Entries still readable
    pub valid_entries: usize,
    /// Configured maximum
    pub capacity: usize,
}
