//! Cache key resolution.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::identifier::build_identifier;
use crate::types::{Overrides, Statement};

// ═══════════════════════════════════════════════════════════════════════════════
// KEY GENERATOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Built-in key generators selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrategy {
    /// Use the identifier as-is
    #[default]
    Identity,
    /// Lowercase hex SHA3-256 of the identifier (fixed 64-char keys)
    Sha3,
}

/// Maps an identifier to the part of the cache key that follows the prefix.
#[derive(Clone)]
pub struct KeyGenerator {
    name: &'static str,
    generate: Arc<dyn Fn(&str) -> String + Send + Sync>,
}

impl KeyGenerator {
    /// Returns the identifier unchanged.
    pub fn identity() -> Self {
        Self {
            name: "identity",
            generate: Arc::new(|identifier| identifier.to_string()),
        }
    }

    /// Hashes the identifier with SHA3-256.
    ///
    /// Useful for backends with key length limits, and keeps SQL text out of
    /// the key space.
    pub fn sha3_256() -> Self {
        Self {
            name: "sha3",
            generate: Arc::new(|identifier| hex::encode(Sha3_256::digest(identifier.as_bytes()))),
        }
    }

    /// Wraps a caller-supplied function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            name: "custom",
            generate: Arc::new(f),
        }
    }

    /// Applies the generator.
    pub fn generate(&self, identifier: &str) -> String {
        (self.generate)(identifier)
    }

    /// Short name, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<KeyStrategy> for KeyGenerator {
    fn from(strategy: KeyStrategy) -> Self {
        match strategy {
            KeyStrategy::Identity => Self::identity(),
            KeyStrategy::Sha3 => Self::sha3_256(),
        }
    }
}

impl fmt::Debug for KeyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyGenerator").field("name", &self.name).finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// The storage key a query's result lives under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Resolves the key for a statement.
    ///
    /// An override key wins and is used verbatim. Otherwise the key is
    /// `prefix + generator(identifier)`. The identifier is only built when it
    /// is needed.
    pub fn resolve(
        statement: &Statement,
        overrides: &Overrides,
        prefix: &str,
        generator: &KeyGenerator,
    ) -> Self {
        match overrides.key() {
            Some(key) => Self(key.to_string()),
            None => {
                let identifier = build_identifier(statement);
                Self(format!("{}{}", prefix, generator.generate(&identifier)))
            }
        }
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}
