//! Classification of model replies.
//!
//! The synthesis prompt asks the model to answer with either a `TEXT:`
//! conversational reply or a `CODE:` query expression. Real models sometimes
//! skip the prefix, so an explicit fallback decides: if the reply mentions a
//! catalogue operation as a call, it is treated as a query, otherwise as
//! conversation. That policy is deliberately narrow and fully unit-tested.

use regex::Regex;
use std::sync::OnceLock;

use crate::query::is_known_operation;

/// A classified model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReply {
    /// Conversational text, to be passed through as the answer.
    Text(String),
    /// A query expression to evaluate against the dataset.
    Query(String),
}

fn call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([a-z][a-z0-9_]*)\s*\(").expect("valid regex"))
}

/// Classifies a raw model reply into text or query.
pub fn classify_reply(response: &str) -> ModelReply {
    let trimmed = response.trim();

    if let Some(rest) = trimmed.strip_prefix("TEXT:") {
        return ModelReply::Text(rest.trim().to_string());
    }

    if let Some(rest) = trimmed.strip_prefix("CODE:") {
        return ModelReply::Query(strip_code_fences(rest));
    }

    // Neither prefix: malformed output. Treat as a query only if it contains
    // a catalogue operation written as a call.
    let stripped = strip_code_fences(trimmed);
    if looks_like_query(&stripped) {
        ModelReply::Query(stripped)
    } else {
        ModelReply::Text(trimmed.to_string())
    }
}

/// Returns true if the text contains a known catalogue operation followed by
/// an opening parenthesis.
pub fn looks_like_query(text: &str) -> bool {
    call_re()
        .captures_iter(text)
        .any(|c| is_known_operation(&c[1]))
}

/// Removes markdown code-fence markup around an expression.
///
/// Handles ```lang fences, bare ``` fences, and single-backtick spans.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = text.trim();

    if let Some(rest) = out.strip_prefix("```") {
        out = match rest.find('\n') {
            // Block fence: drop the language tag line
            Some(idx) => &rest[idx + 1..],
            // Inline fence: no language tag, the body is the expression
            None => rest,
        };
        out = out.trim_end().trim_end_matches("```");
    }

    out.trim_matches('`').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prefix() {
        let reply = classify_reply("TEXT: Hello! Ask me about attendance.");
        assert_eq!(
            reply,
            ModelReply::Text("Hello! Ask me about attendance.".to_string())
        );
    }

    #[test]
    fn test_code_prefix() {
        let reply = classify_reply("CODE: count_present(\"Bea\")");
        assert_eq!(reply, ModelReply::Query("count_present(\"Bea\")".to_string()));
    }

    #[test]
    fn test_code_prefix_with_fences() {
        let reply = classify_reply("CODE: ```\ncount_on(2024-01-01)\n```");
        assert_eq!(reply, ModelReply::Query("count_on(2024-01-01)".to_string()));
    }

    #[test]
    fn test_code_prefix_with_language_fence() {
        let reply = classify_reply("CODE: ```text\npercentage(\"Alan\")\n```");
        assert_eq!(reply, ModelReply::Query("percentage(\"Alan\")".to_string()));
    }

    #[test]
    fn test_code_prefix_with_inline_fence_keeps_operation_name() {
        // An inline fence has no language tag; the body is taken verbatim
        let reply = classify_reply("CODE: ```count_on(2024-01-01)```");
        assert_eq!(reply, ModelReply::Query("count_on(2024-01-01)".to_string()));
    }

    #[test]
    fn test_missing_prefix_with_operation_is_query() {
        let reply = classify_reply("count_present(\"Bea\", from=2024-01-01)");
        assert_eq!(
            reply,
            ModelReply::Query("count_present(\"Bea\", from=2024-01-01)".to_string())
        );
    }

    #[test]
    fn test_missing_prefix_plain_text_is_text() {
        let reply = classify_reply("I can only answer questions about this class.");
        assert_eq!(
            reply,
            ModelReply::Text("I can only answer questions about this class.".to_string())
        );
    }

    #[test]
    fn test_missing_prefix_unknown_call_is_text() {
        // A call shape alone is not enough; the operation must be known.
        let reply = classify_reply("print(\"hello\")");
        assert_eq!(reply, ModelReply::Text("print(\"hello\")".to_string()));
    }

    #[test]
    fn test_missing_prefix_fenced_operation_is_query() {
        let reply = classify_reply("```\nlist_students()\n```");
        assert_eq!(reply, ModelReply::Query("list_students()".to_string()));
    }

    #[test]
    fn test_strip_single_backticks() {
        assert_eq!(strip_code_fences("`total_classes()`"), "total_classes()");
    }

    #[test]
    fn test_strip_inline_fence() {
        assert_eq!(strip_code_fences("```count_on(2024-01-01)```"), "count_on(2024-01-01)");
    }

    #[test]
    fn test_strip_no_fences_is_identity() {
        assert_eq!(strip_code_fences("  below(75)  "), "below(75)");
    }

    #[test]
    fn test_looks_like_query() {
        assert!(looks_like_query("x = count_present(\"Bea\")"));
        assert!(!looks_like_query("counting present students"));
        assert!(!looks_like_query("eval(something)"));
    }

    #[test]
    fn test_empty_reply_is_text() {
        assert_eq!(classify_reply(""), ModelReply::Text(String::new()));
    }
}
