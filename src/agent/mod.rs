//! The question-answering pipeline.
//!
//! One `Agent` binds one dataset to one LLM client and exposes a single
//! operation, `invoke`. Each call runs a fixed-order sequence of stages
//! (normalize dates, synthesize a query, execute it, compose the answer)
//! over a per-call state value. The date stage owns the only two
//! short-circuit exits; everything else proceeds linearly. The contract with
//! the caller is "never throw, always answer": every failure mode is folded
//! into the answer string.

mod compose;
mod dates;
mod state;

pub use compose::APOLOGY_PREFIX;
pub use dates::{normalize_dates, DateOutcome};
pub use state::{ChatState, Outcome};

use chrono::{Local, NaiveDate};
use std::time::Instant;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::llm::{build_query_prompt, classify_reply, FewShotLibrary, LlmClient, ModelReply};
use crate::query::{QueryExecutor, EXEC_ERROR_PREFIX};

/// Fixed answer when the language model cannot be reached.
const MODEL_UNAVAILABLE: &str =
    "The language model is not available right now. Please try again later.";

/// One question-answering pipeline bound to one dataset.
///
/// The dataset is immutable for the agent's lifetime; refreshed data means a
/// new agent. Independent agents may run concurrently, they share nothing
/// mutable.
pub struct Agent {
    dataset: Dataset,
    client: Box<dyn LlmClient>,
    examples: FewShotLibrary,
    sample_rows: usize,
    /// Pinned invocation day, for tests. `None` means the local date at
    /// each invoke.
    today: Option<NaiveDate>,
}

impl Agent {
    /// Creates an agent over the given dataset and model client.
    pub fn new(dataset: Dataset, client: Box<dyn LlmClient>) -> Self {
        Self {
            dataset,
            client,
            examples: FewShotLibrary::default(),
            sample_rows: 3,
            today: None,
        }
    }

    /// Replaces the few-shot example library.
    pub fn with_examples(mut self, examples: FewShotLibrary) -> Self {
        self.examples = examples;
        self
    }

    /// Sets how many sample rows the synthesis prompt embeds.
    pub fn with_sample_rows(mut self, sample_rows: usize) -> Self {
        self.sample_rows = sample_rows;
        self
    }

    /// Pins the invocation day (used by tests to make "today" deterministic).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Answers one question.
    ///
    /// This is the pipeline's only public operation. It always returns a
    /// well-formed answer string; errors surface as error-flavored answers,
    /// never as panics or `Err`.
    pub async fn invoke(&self, question: &str) -> String {
        let start = Instant::now();
        debug!(question_len = question.len(), "Starting pipeline");

        let state = ChatState::new(question);

        // NORMALIZE: the only stage with terminal short-circuit edges
        let state = match normalize_dates(&state.question, &self.dataset, self.today()) {
            DateOutcome::Normalized(rewritten) => state.with_question(rewritten),
            DateOutcome::FutureDate(message)
            | DateOutcome::UnknownDate(message)
            | DateOutcome::Failed(message) => {
                info!(
                    total_duration_ms = start.elapsed().as_millis(),
                    "Pipeline short-circuited on date normalization"
                );
                return message;
            }
        };

        let state = self.synthesize(state).await;
        let state = self.execute(state);

        let answer = compose::compose_answer(self.client.as_ref(), &state).await;
        info!(
            total_duration_ms = start.elapsed().as_millis(),
            had_query = state.query.is_some(),
            "Pipeline complete"
        );
        answer
    }

    /// SYNTHESIZE: one model round-trip, classified into text or query.
    async fn synthesize(&self, state: ChatState) -> ChatState {
        let prompt =
            build_query_prompt(&state.question, &self.dataset, &self.examples, self.sample_rows);

        let llm_start = Instant::now();
        let response = match self.client.complete(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Model call failed: {}", e);
                return state.with_result(Outcome::Error(MODEL_UNAVAILABLE.to_string()));
            }
        };
        debug!(
            llm_duration_ms = llm_start.elapsed().as_millis(),
            response_len = response.len(),
            "Received model reply"
        );

        match classify_reply(&response) {
            ModelReply::Text(text) => state.with_result(Outcome::Text(text)),
            ModelReply::Query(query) => state.with_query(query),
        }
    }

    /// EXECUTE: evaluates the query, if any; a no-op pass-through otherwise.
    fn execute(&self, state: ChatState) -> ChatState {
        let query = match &state.query {
            Some(query) => query.clone(),
            None => return state,
        };

        let executor = QueryExecutor::new(&self.dataset);
        match executor.execute(&query) {
            Ok(value) => {
                debug!(query = %query, result = %value, "Query evaluated");
                state.with_result(Outcome::Value(value))
            }
            Err(e) => {
                debug!(query = %query, "Query evaluation failed: {}", e);
                state.with_result(Outcome::Error(format!("{} {}", EXEC_ERROR_PREFIX, e)))
            }
        }
    }
}
