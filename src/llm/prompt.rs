//! Prompt construction for LLM requests.
//!
//! Two prompts leave this module: the query-synthesis prompt (schema summary,
//! sample rows, operation catalogue, few-shot examples, output-format rules)
//! and the answer-synthesis prompt (question plus raw result).

use std::path::Path;
use tracing::warn;

use crate::dataset::{context_summary, Dataset};
use crate::query::OPERATIONS;

/// Built-in few-shot examples, used when no example file is configured or
/// the configured file is missing.
const DEFAULT_EXAMPLES: &str = "\
Q: How many days was Bea present?
A: CODE: count_present(\"Bea\")

Q: Who was absent on 2024-01-02?
A: CODE: absent_on(2024-01-02)

Q: What is Alan's attendance percentage?
A: CODE: percentage(\"Alan\")

Q: Which students have full attendance?
A: CODE: full_attendance()

Q: Hi, who are you?
A: TEXT: I am your attendance assistant. Ask me anything about class records!";

/// The few-shot example library, loaded once at startup and read-only after.
#[derive(Debug, Clone)]
pub struct FewShotLibrary {
    examples: String,
}

impl FewShotLibrary {
    /// Loads examples from a file, falling back to the built-in set.
    ///
    /// A missing or unreadable file degrades prompt quality, not the agent:
    /// it logs a warning and uses the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let examples = match path {
            Some(p) => match std::fs::read_to_string(p) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!("Few-shot example file {} not loaded: {}", p.display(), e);
                    DEFAULT_EXAMPLES.to_string()
                }
            },
            None => DEFAULT_EXAMPLES.to_string(),
        };
        Self { examples }
    }

    /// Builds a library directly from text (used in tests).
    pub fn from_text(examples: impl Into<String>) -> Self {
        Self {
            examples: examples.into(),
        }
    }

    pub fn examples(&self) -> &str {
        &self.examples
    }
}

impl Default for FewShotLibrary {
    fn default() -> Self {
        Self::from_text(DEFAULT_EXAMPLES)
    }
}

/// Renders the operation catalogue for the prompt.
fn format_catalogue() -> String {
    OPERATIONS
        .iter()
        .map(|(sig, desc)| format!("- {}: {}", sig, desc))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the query-synthesis prompt.
pub fn build_query_prompt(
    question: &str,
    dataset: &Dataset,
    examples: &FewShotLibrary,
    sample_rows: usize,
) -> String {
    format!(
        "You are a smart attendance assistant with access to one class's attendance table.\n\
         \n\
         {summary}\n\
         \n\
         ### Sample Data (first {sample_rows} rows)\n\
         {head}\n\
         \n\
         ### Available Query Operations\n\
         {catalogue}\n\
         \n\
         ### Instructions\n\
         1. Analyze the user's input:\n\
            - If it is a greeting or general chat, reply `TEXT: <your friendly response>`.\n\
            - If it is a data question, reply `CODE: <one call from the operations above>`.\n\
         2. Rules for code:\n\
            - Exactly one operation call, nothing else.\n\
            - Quote student names; write dates as YYYY-MM-DD.\n\
            - Reply with only the prefixed line. No markdown, no explanations.\n\
         \n\
         ### Examples\n\
         {examples}\n\
         \n\
         ### User Input: {question}",
        summary = context_summary(dataset),
        head = dataset.head(sample_rows),
        catalogue = format_catalogue(),
        examples = examples.examples(),
    )
}

/// Builds the answer-synthesis prompt from the question and a raw result.
pub fn build_answer_prompt(question: &str, result: &str) -> String {
    format!(
        "You are an assistant summarizing data results.\n\
         \n\
         User's Question: \"{question}\"\n\
         Raw Data Result: {result}\n\
         \n\
         Task: write a helpful, natural language response.\n\
         - Do NOT repeat the question.\n\
         - Be concise but friendly.\n\
         - If the result is a list of names, list them clearly.\n\
         - If the result is a number, explain what it means.\n\
         \n\
         Response:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AttendanceRecord;
    use std::io::Write;

    fn sample_dataset() -> Dataset {
        Dataset::from_records(&[
            AttendanceRecord::new(1, "Alan", "2024-01-01"),
            AttendanceRecord::new(2, "Bea", "2024-01-01"),
            AttendanceRecord::new(1, "Alan", "2024-01-02"),
        ])
        .unwrap()
    }

    #[test]
    fn test_query_prompt_contains_summary_and_sample() {
        let ds = sample_dataset();
        let prompt = build_query_prompt("who was absent?", &ds, &FewShotLibrary::default(), 3);

        assert!(prompt.contains("Total Students: 2"));
        assert!(prompt.contains("2024-01-02"));
        assert!(prompt.contains("Alan"));
    }

    #[test]
    fn test_query_prompt_contains_catalogue_and_rules() {
        let ds = sample_dataset();
        let prompt = build_query_prompt("who was absent?", &ds, &FewShotLibrary::default(), 3);

        assert!(prompt.contains("count_present(student, from=?, to=?)"));
        assert!(prompt.contains("full_attendance()"));
        assert!(prompt.contains("TEXT:"));
        assert!(prompt.contains("CODE:"));
    }

    #[test]
    fn test_query_prompt_ends_with_question() {
        let ds = sample_dataset();
        let prompt = build_query_prompt("who was absent?", &ds, &FewShotLibrary::default(), 3);
        assert!(prompt.ends_with("### User Input: who was absent?"));
    }

    #[test]
    fn test_few_shot_default_on_missing_file() {
        let library = FewShotLibrary::load(Some(Path::new("/nonexistent/examples.txt")));
        assert!(library.examples().contains("count_present"));
    }

    #[test]
    fn test_few_shot_loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Q: custom?\nA: CODE: list_students()").unwrap();

        let library = FewShotLibrary::load(Some(file.path()));
        assert!(library.examples().contains("custom?"));
    }

    #[test]
    fn test_few_shot_no_path_uses_default() {
        let library = FewShotLibrary::load(None);
        assert!(library.examples().contains("attendance assistant"));
    }

    #[test]
    fn test_answer_prompt_embeds_question_and_result() {
        let prompt = build_answer_prompt("How many days was Bea present?", "1");
        assert!(prompt.contains("\"How many days was Bea present?\""));
        assert!(prompt.contains("Raw Data Result: 1"));
    }
}
