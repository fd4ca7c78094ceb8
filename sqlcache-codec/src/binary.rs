//! Compact binary payloads.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use sqlcache_core::constants::FORMAT_BINCODE;
use sqlcache_core::error::{Result, SqlCacheError};
use sqlcache_core::traits::Serializer;

/// Compact binary encoding backed by `bincode`.
///
/// The format is not self-describing: types relying on `deserialize_any`
/// (untagged enums, `serde_json::Value`, `skip_serializing_if`) do not
/// round-trip. Use [`JsonSerializer`](crate::JsonSerializer) for those.
///
/// Payloads use fixed-width integers and decoding rejects trailing bytes, so
/// a payload written for one shape (a `Vec<T>`) fails to decode as another
/// (an `Option<T>`) instead of yielding a garbage value.
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeSerializer;

impl BincodeSerializer {
    /// Creates a binary serializer.
    pub fn new() -> Self {
        Self
    }
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

impl Serializer for BincodeSerializer {
    fn format(&self) -> &'static str {
        FORMAT_BINCODE
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        options()
            .serialize(value)
            .map_err(|e| SqlCacheError::serialization(FORMAT_BINCODE, e))
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        options()
            .deserialize(bytes)
            .map_err(|e| SqlCacheError::serialization(FORMAT_BINCODE, e))
    }
}
