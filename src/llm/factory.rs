//! LLM client factory.
//!
//! Centralizes provider-specific logic for creating LLM clients.

use crate::error::{Result, RollcallError};
use crate::llm::{
    LlmClient, LlmProvider, MockLlmClient, OllamaClient, OllamaConfig, OpenAiClient, OpenAiConfig,
};

/// Creates an LLM client for the given provider.
///
/// If `api_key` is provided, it takes precedence over environment variables.
/// For OpenAI the key is resolved in order:
/// 1. Provided `api_key` parameter
/// 2. `OPENAI_API_KEY` environment variable
///
/// Model selection honors the config value first, then environment variables
/// (`OPENAI_MODEL`, `OLLAMA_MODEL`).
pub fn create_client(
    provider: LlmProvider,
    model: Option<&str>,
    api_key: Option<String>,
) -> Result<Box<dyn LlmClient>> {
    match provider {
        LlmProvider::OpenAi => {
            let key = api_key
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .ok_or_else(|| {
                    RollcallError::llm("No API key configured. Set OPENAI_API_KEY.")
                })?;
            let model = model
                .map(str::to_string)
                .or_else(|| std::env::var("OPENAI_MODEL").ok())
                .unwrap_or_else(|| "gpt-4o".to_string());
            Ok(Box::new(OpenAiClient::new(OpenAiConfig::new(key, model))?))
        }
        LlmProvider::Ollama => match model {
            Some(model) => {
                let base_url = std::env::var("OLLAMA_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string());
                Ok(Box::new(OllamaClient::new(
                    OllamaConfig::new(model).with_url(base_url),
                )?))
            }
            None => Ok(Box::new(OllamaClient::from_env()?)),
        },
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}
