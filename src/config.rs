//! Configuration management for rollcall.
//!
//! Handles loading configuration from TOML files and environment variables,
//! covering LLM provider settings and agent tuning knobs.

use crate::error::{Result, RollcallError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for rollcall.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Agent pipeline configuration.
    #[serde(default)]
    pub agent: AgentConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider: "openai", "ollama", or "mock".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name (e.g., "gpt-4o", "llama3.2:3b").
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
        }
    }
}

/// Agent pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Path to a few-shot example file. Missing file is non-fatal; the agent
    /// falls back to a built-in example set.
    pub few_shot_path: Option<PathBuf>,

    /// Number of sample rows embedded in the synthesis prompt.
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,
}

fn default_sample_rows() -> usize {
    3
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            few_shot_path: None,
            sample_rows: default_sample_rows(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Returns the default configuration if the file does not exist.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| RollcallError::config(format!("Failed to read config file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| RollcallError::config(format!("Invalid config file: {e}")))
    }

    /// Returns the default config file path.
    ///
    /// `~/.config/rollcall/config.toml` on Linux, or the platform equivalent.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rollcall")
            .join("config.toml")
    }
}
