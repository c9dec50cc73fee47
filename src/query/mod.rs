//! The closed query language the model emits.
//!
//! A query expression is a single call from a fixed operation catalogue,
//! parsed by a tiny grammar and evaluated against the dataset. Free-form code
//! never runs.

mod executor;
mod expr;

pub use executor::{is_known_operation, QueryExecutor, Value, EXEC_ERROR_PREFIX, OPERATIONS};
pub use expr::QueryCall;
