//! Answer composition, the pipeline's final stage.
//!
//! Three paths out: error results get wrapped in a user-facing apology,
//! conversational results pass through untouched, and query results go back
//! to the model once for phrasing, falling back to the literal result if the
//! model is unavailable.

use tracing::debug;

use crate::agent::state::{ChatState, Outcome};
use crate::llm::{build_answer_prompt, LlmClient};

/// Prefix of the user-facing message for error-shaped results.
pub const APOLOGY_PREFIX: &str = "I encountered an issue:";

/// Composes the final answer for a completed state.
pub async fn compose_answer(client: &dyn LlmClient, state: &ChatState) -> String {
    let result = match &state.result {
        Some(result) => result,
        // Every stage records a result before this one runs; an empty state
        // still gets a well-formed answer.
        None => return "I couldn't find an answer to that.".to_string(),
    };

    if let Outcome::Error(message) = result {
        return format!("{} {}", APOLOGY_PREFIX, message);
    }

    // Conversational path: no query was generated, the text is the answer.
    if state.query.is_none() {
        return result.to_string();
    }

    let literal = result.to_string();
    let prompt = build_answer_prompt(&state.question, &literal);
    match client.complete(&prompt).await {
        Ok(answer) => answer.trim().to_string(),
        Err(e) => {
            debug!("Answer synthesis unavailable, using literal result: {}", e);
            literal
        }
    }
}
