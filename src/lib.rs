//! Rollcall is a natural-language assistant over a class attendance sheet.
//!
//! Attendance records are pivoted into one row per student and one column per
//! class date, and questions are answered by a four-stage pipeline: relative
//! date phrases are resolved against the sheet, an LLM turns the question into
//! a call from a small closed query catalogue, the call is evaluated against
//! the table, and a second model pass phrases the raw result as prose. The
//! [`agent::Agent`] type ties the stages together and guarantees that every
//! question gets an answer string, never an error.

pub mod agent;
pub mod config;
pub mod dataset;
pub mod error;
pub mod llm;
pub mod logging;
pub mod query;

pub use error::{Result, RollcallError};
