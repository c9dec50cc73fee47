//! The attendance table backing one question-answering session.
//!
//! Wide format: metadata columns (`roll_number`, `name`) plus one column per
//! class date in `YYYY-MM-DD` form. The table is built once, by pivoting flat
//! presence records, and is read-only afterward.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{Result, RollcallError};

/// Metadata column names, in display order.
const META_COLUMNS: [&str; 2] = ["roll_number", "name"];

fn date_column_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"))
}

/// Returns true if a column name is a class-date column (`YYYY-MM-DD`).
pub fn is_date_column(name: &str) -> bool {
    date_column_re().is_match(name)
}

/// A single presence mark in the table.
///
/// Absence is also the fill value for dates with no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    Present,
    Absent,
}

impl Mark {
    /// Single-letter code used in prompts and rendered samples.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Present => "P",
            Self::Absent => "A",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A flat attendance record: one student present on one date.
///
/// This is the shape the surrounding application stores; the agent consumes
/// it only through [`Dataset::from_records`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub roll_number: u32,
    pub name: String,
    /// Class date in `YYYY-MM-DD` form.
    pub date: String,
}

impl AttendanceRecord {
    pub fn new(roll_number: u32, name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            roll_number,
            name: name.into(),
            date: date.into(),
        }
    }
}

/// One row of the pivoted table.
#[derive(Debug, Clone)]
pub struct StudentRow {
    pub roll_number: u32,
    pub name: String,
    /// Parallel to [`Dataset::date_columns`].
    marks: Vec<Mark>,
}

impl StudentRow {
    /// Returns the mark at the given date-column index.
    pub fn mark_at(&self, idx: usize) -> Mark {
        self.marks.get(idx).copied().unwrap_or(Mark::Absent)
    }

    /// Number of days this student was present.
    pub fn present_count(&self) -> usize {
        self.marks.iter().filter(|m| **m == Mark::Present).count()
    }
}

/// The subject × date presence table.
///
/// Immutable for the lifetime of an agent; a refreshed table means a new
/// agent instance.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Class-date columns, sorted ascending. ISO strings sort chronologically.
    date_columns: Vec<String>,
    rows: Vec<StudentRow>,
}

impl Dataset {
    /// Builds the wide table from flat presence records.
    ///
    /// Every `(roll_number, date)` pair present in the records becomes a `P`;
    /// all other cells fill as `A`. Rows are sorted by roll number, date
    /// columns ascending. Records with a malformed date are rejected.
    pub fn from_records(records: &[AttendanceRecord]) -> Result<Self> {
        let mut dates = BTreeSet::new();
        for record in records {
            if !is_date_column(&record.date) {
                return Err(RollcallError::dataset(format!(
                    "Invalid class date '{}' (expected YYYY-MM-DD)",
                    record.date
                )));
            }
            dates.insert(record.date.clone());
        }
        let date_columns: Vec<String> = dates.into_iter().collect();

        // One row per student, keyed by roll number
        let mut rows: Vec<StudentRow> = Vec::new();
        for record in records {
            if !rows.iter().any(|r| r.roll_number == record.roll_number) {
                rows.push(StudentRow {
                    roll_number: record.roll_number,
                    name: record.name.clone(),
                    marks: vec![Mark::Absent; date_columns.len()],
                });
            }
        }
        rows.sort_by_key(|r| r.roll_number);

        for record in records {
            let col = date_columns
                .iter()
                .position(|d| *d == record.date)
                .expect("date collected above");
            let row = rows
                .iter_mut()
                .find(|r| r.roll_number == record.roll_number)
                .expect("row inserted above");
            row.marks[col] = Mark::Present;
        }

        Ok(Self { date_columns, rows })
    }

    /// Metadata column names.
    pub fn meta_columns(&self) -> &'static [&'static str] {
        &META_COLUMNS
    }

    /// Class-date columns, ascending.
    pub fn date_columns(&self) -> &[String] {
        &self.date_columns
    }

    pub fn rows(&self) -> &[StudentRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Earliest class date, if any.
    pub fn earliest_date(&self) -> Option<&str> {
        self.date_columns.first().map(String::as_str)
    }

    /// Latest class date, if any.
    pub fn latest_date(&self) -> Option<&str> {
        self.date_columns.last().map(String::as_str)
    }

    /// Returns true if the given ISO date is a known class date.
    pub fn has_date(&self, date: &str) -> bool {
        self.date_columns.iter().any(|d| d == date)
    }

    /// Index of a date column, if present.
    pub fn date_index(&self, date: &str) -> Option<usize> {
        self.date_columns.iter().position(|d| d == date)
    }

    /// Finds a student row by name, case-insensitively.
    pub fn find_student(&self, name: &str) -> Option<&StudentRow> {
        let needle = name.trim().to_lowercase();
        self.rows.iter().find(|r| r.name.to_lowercase() == needle)
    }

    /// Renders the first `n` rows as an aligned text table for prompts.
    pub fn head(&self, n: usize) -> String {
        let header: Vec<String> = META_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.date_columns.iter().cloned())
            .collect();

        let mut lines = vec![header.join("  ")];
        for row in self.rows.iter().take(n) {
            let cells: Vec<String> = [row.roll_number.to_string(), row.name.clone()]
                .into_iter()
                .chain(row.marks.iter().map(|m| m.code().to_string()))
                .collect();
            lines.push(cells.join("  "));
        }
        lines.join("\n")
    }
}
