//! Cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sqlcache_codec::SerializerKind;
use sqlcache_core::constants::{DEFAULT_KEY_PREFIX, DEFAULT_TTL_SECONDS};
use sqlcache_core::error::Result;
use sqlcache_core::key::KeyStrategy;

/// Cache configuration.
///
/// Missing fields take their defaults, so a partial JSON document is valid:
///
/// ```rust
/// use sqlcache::CacheConfig;
///
/// let config = CacheConfig::from_json(r#"{ "serializer": "bincode" }"#).unwrap();
/// assert_eq!(config.prefix, "gobp:cache:");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Prefix prepended to generated keys
    pub prefix: String,
    /// Default TTL in seconds
    pub default_ttl_seconds: u64,
    /// Payload encoding
    pub serializer: SerializerKind,
    /// Built-in identifier-to-key mapping
    pub key_strategy: KeyStrategy,
    /// Whether to delete payloads that fail to decode
    pub delete_corrupt_entries: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            default_ttl_seconds: DEFAULT_TTL_SECONDS,
            serializer: SerializerKind::Json,
            key_strategy: KeyStrategy::Identity,
            delete_corrupt_entries: true,
        }
    }
}

impl CacheConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the default TTL. Sub-second precision is dropped.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        if ttl.subsec_nanos() != 0 {
            debug!(
                requested_ms = ttl.as_millis() as u64,
                stored_seconds = ttl.as_secs(),
                "Default TTL truncated to whole seconds"
            );
        }
        self.default_ttl_seconds = ttl.as_secs();
        self
    }

    /// Set the serializer.
    pub fn with_serializer(mut self, serializer: SerializerKind) -> Self {
        self.serializer = serializer;
        self
    }

    /// Set the key strategy.
    pub fn with_key_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    /// Enable or disable deletion of undecodable entries.
    pub fn with_delete_corrupt_entries(mut self, enabled: bool) -> Self {
        self.delete_corrupt_entries = enabled;
        self
    }

    /// The default TTL as a duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    /// Replaces unusable values with defaults.
    ///
    /// An empty prefix and a zero TTL are both replaced; each replacement is
    /// logged.
    pub fn normalized(mut self) -> Self {
        if self.prefix.is_empty() {
            warn!(default = DEFAULT_KEY_PREFIX, "Empty cache key prefix, using default");
            self.prefix = DEFAULT_KEY_PREFIX.to_string();
        }
        if self.default_ttl_seconds == 0 {
            warn!(default = DEFAULT_TTL_SECONDS, "Non-positive default TTL, using default");
            self.default_ttl_seconds = DEFAULT_TTL_SECONDS;
        }
        self
    }
}
