//! Evaluation of query calls against the dataset.
//!
//! The executor sees nothing but the table: no filesystem, no network, no
//! process state. The operation catalogue below is the entire reachable
//! surface, and the table is borrowed immutably so a query cannot alter it.

use std::fmt;

use crate::dataset::{is_date_column, Dataset, Mark, StudentRow};
use crate::error::{Result, RollcallError};
use crate::query::expr::QueryCall;

/// Prefix of the structured error string an evaluation failure produces.
pub const EXEC_ERROR_PREFIX: &str = "ERROR executing code:";

/// The operation catalogue: `(signature, description)`.
///
/// This list is embedded verbatim in the synthesis prompt, so the model picks
/// from exactly what the executor accepts.
pub const OPERATIONS: &[(&str, &str)] = &[
    (
        "count_present(student, from=?, to=?)",
        "days the student was present, optionally within a date range",
    ),
    (
        "count_absent(student, from=?, to=?)",
        "days the student was absent, optionally within a date range",
    ),
    ("status(student, date)", "present or absent on one date"),
    (
        "percentage(student)",
        "the student's attendance percentage over all class days",
    ),
    ("present_on(date)", "names of students present on a date"),
    ("absent_on(date)", "names of students absent on a date"),
    ("count_on(date)", "number of students present on a date"),
    ("list_students()", "all student names in the class"),
    ("total_classes()", "number of class days recorded"),
    (
        "full_attendance()",
        "names of students present on every class day",
    ),
    (
        "below(percent)",
        "names of students whose attendance percentage is below the threshold",
    ),
];

/// Returns true if `name` is an operation in the catalogue.
pub fn is_known_operation(name: &str) -> bool {
    OPERATIONS
        .iter()
        .any(|(sig, _)| sig.split('(').next() == Some(name))
}

/// A raw query result, captured verbatim before answer composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Count(usize),
    Percent(f64),
    Status(Mark),
    Names(Vec<String>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::Percent(p) => write!(f, "{:.1}%", p),
            Self::Status(Mark::Present) => write!(f, "present"),
            Self::Status(Mark::Absent) => write!(f, "absent"),
            Self::Names(names) => {
                if names.is_empty() {
                    write!(f, "(none)")
                } else {
                    write!(f, "{}", names.join(", "))
                }
            }
        }
    }
}

/// Evaluates query expressions against one dataset.
pub struct QueryExecutor<'a> {
    dataset: &'a Dataset,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Parses and evaluates a single query expression.
    ///
    /// Errors here are recoverable: the pipeline converts them into the
    /// [`EXEC_ERROR_PREFIX`] sentinel, never a panic.
    pub fn execute(&self, expr: &str) -> Result<Value> {
        let call = QueryCall::parse(expr)?;
        match call.op.as_str() {
            "count_present" => self.count_marks(&call, Mark::Present),
            "count_absent" => self.count_marks(&call, Mark::Absent),
            "status" => self.status(&call),
            "percentage" => self.percentage(&call),
            "present_on" => self.names_on(&call, Mark::Present),
            "absent_on" => self.names_on(&call, Mark::Absent),
            "count_on" => self.count_on(&call),
            "list_students" => Ok(Value::Names(
                self.dataset.rows().iter().map(|r| r.name.clone()).collect(),
            )),
            "total_classes" => Ok(Value::Count(self.dataset.date_columns().len())),
            "full_attendance" => self.full_attendance(),
            "below" => self.below(&call),
            other => Err(RollcallError::query(format!(
                "unknown operation '{}'",
                other
            ))),
        }
    }

    fn student(&self, name: &str) -> Result<&StudentRow> {
        self.dataset.find_student(name).ok_or_else(|| {
            RollcallError::query(format!("student '{}' not found in this class", name))
        })
    }

    fn known_date<'b>(&self, date: &'b str) -> Result<&'b str> {
        if !is_date_column(date) {
            return Err(RollcallError::query(format!(
                "'{}' is not a YYYY-MM-DD date",
                date
            )));
        }
        if !self.dataset.has_date(date) {
            return Err(RollcallError::query(format!(
                "date '{}' not found in records",
                date
            )));
        }
        Ok(date)
    }

    /// Date-column indices within the optional `from`/`to` range. ISO strings
    /// compare chronologically, so the bounds are plain string comparisons.
    fn range_indices(&self, call: &QueryCall) -> Result<Vec<usize>> {
        let from = call.arg("from", usize::MAX);
        let to = call.arg("to", usize::MAX);
        for bound in [from, to].into_iter().flatten() {
            if !is_date_column(bound) {
                return Err(RollcallError::query(format!(
                    "'{}' is not a YYYY-MM-DD date",
                    bound
                )));
            }
        }

        Ok(self
            .dataset
            .date_columns()
            .iter()
            .enumerate()
            .filter(|(_, d)| {
                from.map_or(true, |f| d.as_str() >= f) && to.map_or(true, |t| d.as_str() <= t)
            })
            .map(|(i, _)| i)
            .collect())
    }

    fn count_marks(&self, call: &QueryCall, mark: Mark) -> Result<Value> {
        let row = self.student(call.require("student", 0)?)?;
        let indices = self.range_indices(call)?;
        let count = indices.iter().filter(|&&i| row.mark_at(i) == mark).count();
        Ok(Value::Count(count))
    }

    fn status(&self, call: &QueryCall) -> Result<Value> {
        let row = self.student(call.require("student", 0)?)?;
        let date = self.known_date(call.require("date", 1)?)?;
        let idx = self.dataset.date_index(date).expect("date validated");
        Ok(Value::Status(row.mark_at(idx)))
    }

    fn percentage(&self, call: &QueryCall) -> Result<Value> {
        let row = self.student(call.require("student", 0)?)?;
        let total = self.dataset.date_columns().len();
        if total == 0 {
            return Err(RollcallError::query("no class days recorded"));
        }
        Ok(Value::Percent(
            row.present_count() as f64 / total as f64 * 100.0,
        ))
    }

    fn names_on(&self, call: &QueryCall, mark: Mark) -> Result<Value> {
        let date = self.known_date(call.require("date", 0)?)?;
        let idx = self.dataset.date_index(date).expect("date validated");
        Ok(Value::Names(
            self.dataset
                .rows()
                .iter()
                .filter(|r| r.mark_at(idx) == mark)
                .map(|r| r.name.clone())
                .collect(),
        ))
    }

    fn count_on(&self, call: &QueryCall) -> Result<Value> {
        let date = self.known_date(call.require("date", 0)?)?;
        let idx = self.dataset.date_index(date).expect("date validated");
        let count = self
            .dataset
            .rows()
            .iter()
            .filter(|r| r.mark_at(idx) == Mark::Present)
            .count();
        Ok(Value::Count(count))
    }

    fn full_attendance(&self) -> Result<Value> {
        let total = self.dataset.date_columns().len();
        Ok(Value::Names(
            self.dataset
                .rows()
                .iter()
                .filter(|r| r.present_count() == total)
                .map(|r| r.name.clone())
                .collect(),
        ))
    }

    fn below(&self, call: &QueryCall) -> Result<Value> {
        let raw = call.require("percent", 0)?;
        let threshold: f64 = raw
            .trim_end_matches('%')
            .parse()
            .map_err(|_| RollcallError::query(format!("'{}' is not a percentage", raw)))?;
        let total = self.dataset.date_columns().len();
        if total == 0 {
            return Err(RollcallError::query("no class days recorded"));
        }
        Ok(Value::Names(
            self.dataset
                .rows()
                .iter()
                .filter(|r| (r.present_count() as f64 / total as f64 * 100.0) < threshold)
                .map(|r| r.name.clone())
                .collect(),
        ))
    }
}
