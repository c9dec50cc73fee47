//! Temporal phrase resolution.
//!
//! Scans the question for a fixed vocabulary of date expressions, resolves
//! each to an absolute calendar date relative to the invocation day, checks
//! it against the dataset's known class dates, and rewrites the question
//! in place. Two failures are terminal for the pipeline: a date in the
//! future, and a date the table has never seen.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use regex::Regex;
use std::sync::OnceLock;

use crate::dataset::Dataset;

/// The resolvable phrase vocabulary.
fn phrase_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:today|yesterday|tomorrow|\d+\s+days?\s+(?:ago|before|after)|next\s+[a-z]+|on\s+[a-z]+day|\d{4}-\d{2}-\d{2})\b",
        )
        .expect("valid regex")
    })
}

/// Result of the normalization stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOutcome {
    /// Question text with every phrase substituted; pipeline continues.
    Normalized(String),
    /// A resolved date lies after the invocation day; terminal answer text.
    FutureDate(String),
    /// A resolved date is not a known class date; terminal answer text.
    UnknownDate(String),
    /// Resolution itself failed (e.g. out-of-range arithmetic); terminal.
    Failed(String),
}

/// Resolves and substitutes temporal phrases in the question.
///
/// `today` is the invocation day; the agent injects it so tests can pin the
/// clock. Unrecognized phrases (e.g. "next week") are left untouched rather
/// than guessed at.
pub fn normalize_dates(question: &str, dataset: &Dataset, today: NaiveDate) -> DateOutcome {
    let mut rewritten = String::with_capacity(question.len());
    let mut last_end = 0;

    for m in phrase_re().find_iter(question) {
        rewritten.push_str(&question[last_end..m.start()]);

        match resolve_phrase(m.as_str(), today) {
            Resolution::Date(date) => {
                let formatted = date.format("%Y-%m-%d").to_string();
                if date > today {
                    return DateOutcome::FutureDate(format!(
                        "Attendance can't be checked for a future date: {}",
                        formatted
                    ));
                }
                if !dataset.has_date(&formatted) {
                    let latest = dataset.latest_date().unwrap_or("N/A");
                    return DateOutcome::UnknownDate(format!(
                        "Date '{}' not found in records. Latest date is: {}",
                        formatted, latest
                    ));
                }
                rewritten.push_str(&formatted);
            }
            Resolution::NotADate => rewritten.push_str(m.as_str()),
            Resolution::OutOfRange => {
                return DateOutcome::Failed(format!(
                    "Error processing dates: '{}' is out of range",
                    m.as_str()
                ));
            }
        }
        last_end = m.end();
    }
    rewritten.push_str(&question[last_end..]);

    DateOutcome::Normalized(rewritten)
}

enum Resolution {
    Date(NaiveDate),
    /// Phrase matched the vocabulary shape but names no date (e.g. "next week").
    NotADate,
    OutOfRange,
}

fn resolve_phrase(phrase: &str, today: NaiveDate) -> Resolution {
    let lower = phrase.trim().to_lowercase();

    match lower.as_str() {
        "today" => return Resolution::Date(today),
        "yesterday" => return checked(today.checked_sub_days(Days::new(1))),
        "tomorrow" => return checked(today.checked_add_days(Days::new(1))),
        _ => {}
    }

    if let Some(rest) = lower.strip_prefix("next ") {
        return match rest.parse::<Weekday>() {
            Ok(target) => {
                // Strictly after today
                let ahead = match days_between(today.weekday(), target) {
                    0 => 7,
                    n => n,
                };
                checked(today.checked_add_days(Days::new(ahead)))
            }
            Err(_) => Resolution::NotADate,
        };
    }

    if let Some(rest) = lower.strip_prefix("on ") {
        return match rest.parse::<Weekday>() {
            Ok(target) => {
                // Attendance questions look backward: most recent occurrence
                // on or before today.
                let back = days_between(target, today.weekday());
                checked(today.checked_sub_days(Days::new(back)))
            }
            Err(_) => Resolution::NotADate,
        };
    }

    if lower.contains("day") {
        // "N day(s) ago|before|after"
        let mut parts = lower.split_whitespace();
        let n: u64 = match parts.next().and_then(|w| w.parse().ok()) {
            Some(n) => n,
            None => return Resolution::NotADate,
        };
        let _unit = parts.next();
        return match parts.next() {
            Some("ago") | Some("before") => checked(today.checked_sub_days(Days::new(n))),
            Some("after") => checked(today.checked_add_days(Days::new(n))),
            _ => Resolution::NotADate,
        };
    }

    match NaiveDate::parse_from_str(&lower, "%Y-%m-%d") {
        Ok(date) => Resolution::Date(date),
        Err(_) => Resolution::NotADate,
    }
}

/// Days from weekday `from` forward to weekday `to` (0..=6).
fn days_between(from: Weekday, to: Weekday) -> u64 {
    let from = from.num_days_from_monday() as u64;
    let to = to.num_days_from_monday() as u64;
    (7 + to - from) % 7
}

fn checked(date: Option<NaiveDate>) -> Resolution {
    match date {
        Some(d) => Resolution::Date(d),
        None => Resolution::OutOfRange,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AttendanceRecord;

    fn sample_dataset() -> Dataset {
        Dataset::from_records(&[
            AttendanceRecord::new(1, "Alan", "2024-01-01"),
            AttendanceRecord::new(1, "Alan", "2024-01-02"),
            AttendanceRecord::new(1, "Alan", "2024-01-03"),
        ])
        .unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_today_substituted() {
        let outcome = normalize_dates("who was present today?", &sample_dataset(), day("2024-01-03"));
        assert_eq!(
            outcome,
            DateOutcome::Normalized("who was present 2024-01-03?".to_string())
        );
    }

    #[test]
    fn test_yesterday_substituted() {
        let outcome =
            normalize_dates("attendance yesterday", &sample_dataset(), day("2024-01-03"));
        assert_eq!(
            outcome,
            DateOutcome::Normalized("attendance 2024-01-02".to_string())
        );
    }

    #[test]
    fn test_tomorrow_is_future_error() {
        let outcome = normalize_dates("who comes tomorrow?", &sample_dataset(), day("2024-01-03"));
        match outcome {
            DateOutcome::FutureDate(msg) => {
                assert!(msg.contains("2024-01-04"));
                assert!(msg.contains("future date"));
            }
            other => panic!("Expected FutureDate, got {:?}", other),
        }
    }

    #[test]
    fn test_days_ago() {
        let outcome = normalize_dates(
            "attendance 2 days ago",
            &sample_dataset(),
            day("2024-01-03"),
        );
        assert_eq!(
            outcome,
            DateOutcome::Normalized("attendance 2024-01-01".to_string())
        );
    }

    #[test]
    fn test_days_before_and_after() {
        let outcome = normalize_dates(
            "attendance 1 day before",
            &sample_dataset(),
            day("2024-01-02"),
        );
        assert_eq!(
            outcome,
            DateOutcome::Normalized("attendance 2024-01-01".to_string())
        );

        // "after" counts forward from today, so it always lands in the future
        let outcome = normalize_dates(
            "attendance 1 day after",
            &sample_dataset(),
            day("2024-01-01"),
        );
        assert!(matches!(outcome, DateOutcome::FutureDate(_)));
    }

    #[test]
    fn test_on_weekday_resolves_backward() {
        // 2024-01-03 was a Wednesday; "on monday" is 2024-01-01
        let outcome = normalize_dates(
            "who was present on monday?",
            &sample_dataset(),
            day("2024-01-03"),
        );
        assert_eq!(
            outcome,
            DateOutcome::Normalized("who was present 2024-01-01?".to_string())
        );
    }

    #[test]
    fn test_next_weekday_is_future_error() {
        let outcome = normalize_dates(
            "attendance next friday",
            &sample_dataset(),
            day("2024-01-03"),
        );
        assert!(matches!(outcome, DateOutcome::FutureDate(_)));
    }

    #[test]
    fn test_absolute_date_passthrough() {
        let outcome = normalize_dates(
            "was Alan present on 2024-01-02 or 2024-01-03?",
            &sample_dataset(),
            day("2024-01-03"),
        );
        assert_eq!(
            outcome,
            DateOutcome::Normalized("was Alan present on 2024-01-02 or 2024-01-03?".to_string())
        );
    }

    #[test]
    fn test_absolute_future_date_short_circuits() {
        let outcome = normalize_dates(
            "attendance on 2099-01-01",
            &sample_dataset(),
            day("2024-01-03"),
        );
        match outcome {
            DateOutcome::FutureDate(msg) => assert!(msg.contains("2099-01-01")),
            other => panic!("Expected FutureDate, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_date_names_latest() {
        let outcome = normalize_dates(
            "attendance on 2023-12-25",
            &sample_dataset(),
            day("2024-01-03"),
        );
        match outcome {
            DateOutcome::UnknownDate(msg) => {
                assert!(msg.contains("2023-12-25"));
                assert!(msg.contains("2024-01-03"));
            }
            other => panic!("Expected UnknownDate, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_phrases_all_substituted() {
        let outcome = normalize_dates(
            "compare today with yesterday",
            &sample_dataset(),
            day("2024-01-03"),
        );
        assert_eq!(
            outcome,
            DateOutcome::Normalized("compare 2024-01-03 with 2024-01-02".to_string())
        );
    }

    #[test]
    fn test_non_temporal_text_unchanged() {
        let question = "how many students are in the class?";
        let outcome = normalize_dates(question, &sample_dataset(), day("2024-01-03"));
        assert_eq!(outcome, DateOutcome::Normalized(question.to_string()));
    }

    #[test]
    fn test_unparseable_vocabulary_word_left_alone() {
        // "next week" matches the phrase shape but names no weekday
        let outcome = normalize_dates(
            "see you next week",
            &sample_dataset(),
            day("2024-01-03"),
        );
        assert_eq!(
            outcome,
            DateOutcome::Normalized("see you next week".to_string())
        );
    }

    #[test]
    fn test_huge_offset_fails_gracefully() {
        // Overflows checked_sub_days, so resolution must report Failed
        let outcome = normalize_dates(
            "attendance 99999999999999999 days ago",
            &sample_dataset(),
            day("2024-01-03"),
        );
        match outcome {
            DateOutcome::Failed(msg) => assert!(msg.contains("out of range")),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }
}
