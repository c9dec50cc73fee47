//! Per-question conversation state.
//!
//! One `ChatState` is created per `invoke` call and flows through the
//! pipeline stages. Stages never mutate it in place; each produces a new
//! value via the `with_*` constructors, which keeps the audit trail linear.

use std::fmt;

use crate::query::Value;

/// The raw outcome a stage records before answer composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Conversational text from the model, passed through as-is.
    Text(String),
    /// A successfully evaluated query result.
    Value(Value),
    /// A recoverable failure, carried as its sentinel message.
    Error(String),
}

impl Outcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => write!(f, "{}", t),
            Self::Value(v) => write!(f, "{}", v),
            Self::Error(e) => write!(f, "{}", e),
        }
    }
}

/// The record threaded through the pipeline for one question.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    /// Current question text; the date-normalization stage rewrites it.
    pub question: String,
    /// Query expression, once the synthesis stage produces one.
    pub query: Option<String>,
    /// Raw result, once execution (or an early exit) produces one.
    pub result: Option<Outcome>,
    /// Final answer, set only by composition or a short-circuit.
    pub answer: Option<String>,
}

impl ChatState {
    /// Creates the fresh state for one question.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    /// Derives a state with rewritten question text.
    pub fn with_question(self, question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..self
        }
    }

    /// Derives a state carrying a query expression.
    pub fn with_query(self, query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..self
        }
    }

    /// Derives a state carrying a raw result.
    pub fn with_result(self, result: Outcome) -> Self {
        Self {
            result: Some(result),
            ..self
        }
    }

    /// Derives a state carrying the final answer.
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..self
        }
    }
}
