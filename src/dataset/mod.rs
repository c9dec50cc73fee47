//! Attendance dataset types.
//!
//! One dataset backs one question-answering session: a wide table with one
//! row per student and one column per class date.

mod summary;
mod table;

pub use summary::context_summary;
pub use table::{is_date_column, AttendanceRecord, Dataset, Mark, StudentRow};
