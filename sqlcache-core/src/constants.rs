//! Defaults shared by every sqlcache crate.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// KEY CONSTRUCTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Prefix prepended to every generated cache key.
///
/// Never applied to an explicit key override.
pub const DEFAULT_KEY_PREFIX: &str = "gobp:cache:";

/// Separator between the SQL text and the rendered parameter list in an identifier.
pub const IDENTIFIER_SEPARATOR: &str = "-";

/// Rendering of a `NULL` parameter.
pub const NULL_LITERAL: &str = "<nil>";

// ═══════════════════════════════════════════════════════════════════════════════
// EXPIRATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Default time-to-live in seconds (1 hour).
pub const DEFAULT_TTL_SECONDS: u64 = 3600;

/// Default time-to-live for cached results.
pub const DEFAULT_TTL: Duration = Duration::from_secs(DEFAULT_TTL_SECONDS);

// ═══════════════════════════════════════════════════════════════════════════════
// SERIALIZER FORMATS
// ═══════════════════════════════════════════════════════════════════════════════

/// Format name reported by the JSON serializer.
pub const FORMAT_JSON: &str = "json";

/// Format name reported by the binary serializer.
pub const FORMAT_BINCODE: &str = "bincode";
