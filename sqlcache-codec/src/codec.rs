//! Runtime serializer selection.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use sqlcache_core::error::Result;
use sqlcache_core::traits::Serializer;

use crate::{BincodeSerializer, JsonSerializer};

/// Serializer named in configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializerKind {
    /// Self-describing JSON
    #[default]
    Json,
    /// Compact binary
    Bincode,
}

impl fmt::Display for SerializerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializerKind::Json => f.write_str("json"),
            SerializerKind::Bincode => f.write_str("bincode"),
        }
    }
}

/// One of the built-in serializers, fixed for the lifetime of a cache.
#[derive(Clone, Copy, Debug)]
pub enum Codec {
    /// JSON payloads
    Json(JsonSerializer),
    /// Binary payloads
    Bincode(BincodeSerializer),
}

impl Codec {
    /// Returns which serializer this codec uses.
    pub fn kind(&self) -> SerializerKind {
        match self {
            Codec::Json(_) => SerializerKind::Json,
            Codec::Bincode(_) => SerializerKind::Bincode,
        }
    }
}

impl Default for Codec {
    fn default() -> Self {
        Codec::Json(JsonSerializer)
    }
}

impl From<SerializerKind> for Codec {
    fn from(kind: SerializerKind) -> Self {
        match kind {
            SerializerKind::Json => Codec::Json(JsonSerializer),
            SerializerKind::Bincode => Codec::Bincode(BincodeSerializer),
        }
    }
}

impl Serializer for Codec {
    fn format(&self) -> &'static str {
        match self {
            Codec::Json(s) => s.format(),
            Codec::Bincode(s) => s.format(),
        }
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        match self {
            Codec::Json(s) => s.serialize(value),
            Codec::Bincode(s) => s.serialize(value),
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self {
            Codec::Json(s) => s.deserialize(bytes),
            Codec::Bincode(s) => s.deserialize(bytes),
        }
    }
}
