//! JSON payloads.

use serde::de::DeserializeOwned;
use serde::Serialize;

use sqlcache_core::constants::FORMAT_JSON;
use sqlcache_core::error::{Result, SqlCacheError};
use sqlcache_core::traits::Serializer;

/// Self-describing JSON encoding.
///
/// Larger than [`BincodeSerializer`](crate::BincodeSerializer) but tolerant of
/// added fields and readable when inspecting a cache by hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    /// Creates a JSON serializer.
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for JsonSerializer {
    fn format(&self) -> &'static str {
        FORMAT_JSON
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| SqlCacheError::serialization(FORMAT_JSON, e))
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| SqlCacheError::serialization(FORMAT_JSON, e))
    }
}
