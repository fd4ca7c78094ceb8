//! Deterministic identifiers for finalized statements.
//!
//! An identifier is the SQL text, a `-` separator, and the rendered parameter
//! list:
//!
//! ```text
//! SELECT * FROM users WHERE id = ?-[42]
//! ```
//!
//! Building one never touches the statement, so it can run on the exact value
//! that is later handed to the executor.

use crate::constants::IDENTIFIER_SEPARATOR;
use crate::types::{render_params, Statement};

/// Builds the identifier for a finalized statement.
pub fn build_identifier(statement: &Statement) -> String {
    let params = render_params(statement.params());
    let mut identifier =
        String::with_capacity(statement.sql().len() + IDENTIFIER_SEPARATOR.len() + params.len());
    identifier.push_str(statement.sql());
    identifier.push_str(IDENTIFIER_SEPARATOR);
    identifier.push_str(&params);
    identifier
}

impl Statement {
    /// Shorthand for [`build_identifier`].
    pub fn identifier(&self) -> String {
        build_identifier(self)
    }
}
