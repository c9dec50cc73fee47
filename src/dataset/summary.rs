//! Semantic summary of a dataset's shape for prompt construction.
//!
//! Produces the structural description embedded in the synthesis prompt so
//! the model understands the wide format (students vs dates) before it picks
//! a query operation.

use super::Dataset;

/// Formats a structural description of the table.
///
/// Pure function with no failure modes: an empty table yields `N/A`
/// placeholders rather than an error.
pub fn context_summary(dataset: &Dataset) -> String {
    let total_students = dataset.row_count();
    let total_classes = dataset.date_columns().len();
    let start_date = dataset.earliest_date().unwrap_or("N/A");
    let end_date = dataset.latest_date().unwrap_or("N/A");
    let meta_cols = dataset.meta_columns().join(", ");

    format!(
        "### Dataset Structure (Wide Format)\n\
         - Rows: each row represents a SINGLE STUDENT.\n\
         - Metadata Columns: {meta_cols} (use these to identify students)\n\
         - Data Columns: {total_classes} columns representing class dates from {start_date} to {end_date}.\n\
         \n\
         ### Statistics\n\
         - Total Students: {total_students}\n\
         - Total Class Days: {total_classes}\n\
         - Latest Date: {end_date}\n\
         \n\
         ### Attendance Codes\n\
         - 'P' = Present\n\
         - 'A' or empty = Absent"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AttendanceRecord;

    fn sample_dataset() -> Dataset {
        Dataset::from_records(&[
            AttendanceRecord::new(1, "Alan", "2024-01-01"),
            AttendanceRecord::new(1, "Alan", "2024-01-03"),
            AttendanceRecord::new(2, "Bea", "2024-01-01"),
        ])
        .unwrap()
    }

    #[test]
    fn test_summary_contains_counts_and_range() {
        let summary = context_summary(&sample_dataset());

        assert!(summary.contains("Total Students: 2"));
        assert!(summary.contains("Total Class Days: 2"));
        assert!(summary.contains("from 2024-01-01 to 2024-01-03"));
        assert!(summary.contains("Latest Date: 2024-01-03"));
    }

    #[test]
    fn test_summary_names_meta_columns() {
        let summary = context_summary(&sample_dataset());
        assert!(summary.contains("roll_number, name"));
    }

    #[test]
    fn test_summary_contains_legend() {
        let summary = context_summary(&sample_dataset());
        assert!(summary.contains("'P' = Present"));
        assert!(summary.contains("'A' or empty = Absent"));
    }

    #[test]
    fn test_empty_dataset_uses_placeholders() {
        let summary = context_summary(&Dataset::default());

        assert!(summary.contains("Total Students: 0"));
        assert!(summary.contains("from N/A to N/A"));
        assert!(summary.contains("Latest Date: N/A"));
    }
}
