//! Error types for sqlcache.
//!
//! Errors fall into three classes with different propagation rules:
//!
//! - **Cache miss**: storage reads and payload decoding. Absorbed by the
//!   orchestrator, which falls through to the database.
//! - **Execution failure**: the wrapped query executor failed. Returned to the
//!   caller unchanged; nothing is written back.
//! - **Write-back failure**: encoding or storing a fresh result. Logged, the
//!   caller still gets the result.

use thiserror::Error;

/// Result type alias using `SqlCacheError`.
pub type Result<T> = std::result::Result<T, SqlCacheError>;

/// Main error type for all sqlcache operations.
#[derive(Debug, Error)]
pub enum SqlCacheError {
    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The storage backend failed to serve or accept a request.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Key is not present in storage.
    #[error("Missing key on storage: {0}")]
    MissingKey(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Encoding or decoding a cached payload failed.
    #[error("{format} serialization failed: {reason}")]
    Serialization {
        /// Serializer format name
        format: &'static str,
        /// Underlying failure
        reason: String,
    },

    /// JSON error outside of payload encoding (e.g. configuration files).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // EXECUTION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The backing database rejected or failed the query.
    #[error("Query execution failed: {0}")]
    Execution(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration could not be used.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SqlCacheError {
    /// Builds a serialization error for the given format.
    pub fn serialization(format: &'static str, reason: impl ToString) -> Self {
        SqlCacheError::Serialization {
            format,
            reason: reason.to_string(),
        }
    }

    /// Returns true if this error only means "serve from the database instead".
    pub fn is_cache_miss_class(&self) -> bool {
        matches!(
            self,
            SqlCacheError::Storage(_)
                | SqlCacheError::MissingKey(_)
                | SqlCacheError::Serialization { .. }
        )
    }

    /// Returns true if the query itself failed.
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, SqlCacheError::Execution(_))
    }
}
