//! Finalized statements and the query unit passed through executors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Overrides, Value};

/// A finalized SQL statement: compiled text plus ordered bound parameters.
///
/// The text is expected in the backend's native placeholder syntax. Nothing in
/// sqlcache rewrites or recompiles it; the same statement feeds both the cache
/// identifier and the fallback execution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    /// Creates a statement with no bound parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a statement with the given parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Binds the next positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    /// The compiled SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound parameters, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// A statement together with the caller's per-call overrides.
///
/// This is the unit every [`QueryExecutor`](crate::QueryExecutor) receives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// The finalized statement
    pub statement: Statement,
    /// Per-call cache overrides
    #[serde(default)]
    pub overrides: Overrides,
}

impl Query {
    /// Creates a query from SQL text with no parameters and no overrides.
    pub fn new(sql: impl Into<String>) -> Self {
        Self::from_statement(Statement::new(sql))
    }

    /// Wraps an existing statement.
    pub fn from_statement(statement: Statement) -> Self {
        Self {
            statement,
            overrides: Overrides::default(),
        }
    }

    /// Binds the next positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.statement = self.statement.bind(value);
        self
    }

    /// Overrides the cache key for this call.
    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.overrides = self.overrides.with_key(key);
        self
    }

    /// Overrides the time-to-live for this call.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.overrides = self.overrides.with_ttl(ttl);
        self
    }

    /// Replaces all overrides.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }
}

impl From<Statement> for Query {
    fn from(statement: Statement) -> Self {
        Self::from_statement(statement)
    }
}
