//! Core data types for sqlcache.

mod overrides;
mod statement;
mod value;

pub use overrides::Overrides;
pub use statement::{Query, Statement};
pub use value::{render_params, Value};
