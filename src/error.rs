//! Error types for rollcall.
//!
//! Defines the main error enum used throughout the crate. The agent pipeline
//! never surfaces these to the caller of `invoke`; they exist for the
//! construction paths (config, clients, dataset loading) and for the stages
//! to convert into answer text.

use thiserror::Error;

/// Main error type for rollcall operations.
#[derive(Error, Debug)]
pub enum RollcallError {
    /// LLM API errors (missing key, rate limits, timeouts, etc.)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Dataset construction errors (no rows, malformed records, etc.)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Query expression errors (unparseable call, unknown operation, bad arguments)
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RollcallError {
    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates a dataset error with the given message.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Llm(_) => "LLM Error",
            Self::Dataset(_) => "Dataset Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using RollcallError.
pub type Result<T> = std::result::Result<T, RollcallError>;
