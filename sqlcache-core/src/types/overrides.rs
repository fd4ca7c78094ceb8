//! Per-call cache overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Optional per-call overrides for the cache key and time-to-live.
///
/// Set by the caller on the [`Query`](crate::Query) before it is executed and
/// read once while that query is handled. An override key is used verbatim:
/// the configured prefix is not prepended and the key generator is not run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ttl: Option<Duration>,
}

impl Overrides {
    /// Creates an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit cache key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets an explicit time-to-live.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Returns the override key, if one was given.
    ///
    /// `Some("")` is a present override and is honored as such.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the override TTL, if one was given.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Returns true if neither override is set.
    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.ttl.is_none()
    }
}
